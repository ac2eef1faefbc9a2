use bracket_terminal::prelude::RGB;

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub hp: i32,
    pub power: i32,
    pub defense: i32,
    pub xp_given: i32,
    pub magic_resistance: Option<f32>,
    /// Shallowest floor the monster is rolled on.
    pub min_floor: u32,
    /// Relative spawn weight; zero means "never rolled at random".
    pub weight: u32,
}

impl MonsterTemplate {
    pub fn roster() -> Vec<Self> {
        let green = RGB::from_u8(63, 127, 63);
        vec![
            Self::new("Orc", 'o', green, 10, 5, 0, 35, 0, 80),
            Self::new("Troll", 'T', RGB::from_u8(0, 127, 0), 16, 11, 5, 100, 3, 15),
            Self::new("Emu", 'E', green, 12, 6, 1, 50, 1, 40),
            Self::new("Hobgoblin", 'H', green, 14, 7, 2, 70, 2, 35),
            Self::new("Quagga", 'Q', green, 12, 9, 2, 80, 2, 30),
            Self::new("Bat", 'B', green, 14, 13, 5, 60, 4, 25),
            Self::new("Centaur", 'C', green, 20, 12, 5, 135, 4, 20),
            Self::new("Nymph", 'N', green, 16, 15, 10, 160, 5, 20),
            Self::new("Aquator", 'A', green, 20, 14, 8, 120, 5, 20),
            Self::new("Kestral", 'K', green, 5, 15, 14, 250, 6, 15),
            Self::new("Rattlesnake", 'R', green, 15, 15, 10, 300, 6, 15),
            Self::new("Wraith", 'W', green, 20, 17, 10, 350, 7, 15),
            Self::new("Jabberwock", 'J', green, 14, 16, 8, 350, 7, 15),
            Self::new("Griffith", 'G', RGB::from_u8(0, 0, 255), 28, 17, 13, 750, 8, 10),
            Self::new("fancy rat", 'f', green, 1, 33, 0, 500, 8, 5),
        ]
    }

    /// The unique end-of-game boss.
    pub fn ancient_dragon() -> Self {
        let mut dragon = Self::new("Ancient Dragon", 'D', RGB::from_u8(255, 0, 0), 35, 23, 15, 0, 0, 0);
        dragon.magic_resistance = Some(0.5);
        dragon
    }

    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &'static str,
        glyph: char,
        color: RGB,
        hp: i32,
        power: i32,
        defense: i32,
        xp_given: i32,
        min_floor: u32,
        weight: u32,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            hp,
            power,
            defense,
            xp_given,
            magic_resistance: None,
            min_floor,
            weight,
        }
    }
}

/// Starting stats of the player character.
#[derive(Clone, Debug)]
pub struct PlayerTemplate {
    pub hp: i32,
    pub power: i32,
    pub defense: i32,
    pub level_up_base: i32,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            hp: 30,
            power: 3,
            defense: 8,
            level_up_base: 130,
        }
    }
}
