use serde::{Deserialize, Serialize};

/// Tunable rules for a run. Everything the turn engine, combat resolver and
/// floor generator treat as a constant lives here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Radius of the player's field of view.
    pub fov_radius: i32,
    pub player_inventory_capacity: usize,
    /// Width of the "diff <= 0" band that still deals one point of damage.
    pub min_damage_window: i32,
    /// First-hit damage at which the player earns a follow-up strike.
    pub follow_up_threshold: i32,
    pub level_up_hp: i32,
    pub level_up_power: i32,
    pub level_up_defense: i32,
    /// Name of the unique monster whose death clears the game.
    pub boss_name: String,
    /// Floor on which the boss is placed by the default generator.
    pub boss_floor: u32,
    pub base_width: i32,
    pub base_height: i32,
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
    pub room_min_size: i32,
    pub room_max_size: i32,
    /// Number of records kept by the ranking board.
    pub score_capacity: usize,
    /// Lines scrolled by one page in the history viewer.
    pub history_page: i32,
    pub seed: u64,
}

impl GameConfig {
    pub const DEFAULT_FOV_RADIUS: i32 = 8;
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 26;
    pub const DEFAULT_SEED: u64 = 0x5eed_d1a6;

    pub fn new() -> Self {
        Self {
            fov_radius: Self::DEFAULT_FOV_RADIUS,
            player_inventory_capacity: Self::DEFAULT_INVENTORY_CAPACITY,
            min_damage_window: 4,
            follow_up_threshold: 8,
            level_up_hp: 20,
            level_up_power: 1,
            level_up_defense: 1,
            boss_name: "Ancient Dragon".to_string(),
            boss_floor: 10,
            base_width: 40,
            base_height: 25,
            min_width: 20,
            max_width: 80,
            min_height: 20,
            max_height: 43,
            room_min_size: 6,
            room_max_size: 10,
            score_capacity: 30,
            history_page: 10,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Defaults overridden by `DELVE_FOV_RADIUS` and `DELVE_SEED` when set.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Some(radius) = read_env("DELVE_FOV_RADIUS") {
            config.fov_radius = radius;
        }
        if let Some(seed) = read_env("DELVE_SEED") {
            config.seed = seed;
        }
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("ignoring unparsable {key}={raw:?}");
            None
        }
    }
}
