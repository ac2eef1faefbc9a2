use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Serialize};
use specs::prelude::{Component, DenseVecStorage, Entity, NullStorage, VecStorage};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

/// Draw tier. Higher tiers are drawn on top; it never affects behaviour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderOrder {
    Corpse,
    Item,
    Actor,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub glyph: u16,
    pub color: RGB,
    pub order: RenderOrder,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub name: String,
}

impl Component for Name {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct BlocksTile;

impl Component for BlocksTile {
    type Storage = NullStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    pub hp: i32,
    pub base_power: i32,
    pub base_defense: i32,
    /// Fraction of spell damage ignored, if any.
    pub magic_resistance: Option<f32>,
}

impl Fighter {
    pub fn new(hp: i32, base_power: i32, base_defense: i32) -> Self {
        Self {
            max_hp: hp,
            hp,
            base_power,
            base_defense,
            magic_resistance: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtracts `amount`, never going below zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.hp = (self.hp - amount).clamp(0, self.max_hp);
    }

    /// Restores up to `amount` hit points and returns how many were gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.hp == self.max_hp {
            return 0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        self.hp - before
    }

    pub fn spell_damage(&self, damage: i32) -> i32 {
        match self.magic_resistance {
            Some(resist) => (damage as f32 * (1.0 - resist.clamp(0.0, 1.0))).round() as i32,
            None => damage,
        }
    }
}

impl Component for Fighter {
    type Storage = VecStorage<Self>;
}

/// Gold carried by an actor. Every actor is spawned with one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wealth {
    pub gold: i32,
}

impl Component for Wealth {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiKind {
    Hostile,
    Confused {
        turns_remaining: i32,
        previous: Box<AiKind>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ai {
    pub kind: AiKind,
}

impl Component for Ai {
    type Storage = DenseVecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Sale value, liquidated into gold when the run is cleared.
    pub value: i32,
}

impl Component for Item {
    type Storage = DenseVecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Consumable {
    Healing { amount: i32 },
    Lightning { damage: i32, max_range: i32 },
    Confusion { turns: i32 },
    Fireball { damage: i32, radius: i32 },
    /// Currency: credited on pickup, never stored in an inventory.
    Gold { amount: i32 },
}

impl Consumable {
    pub fn is_currency(&self) -> bool {
        matches!(self, Consumable::Gold { .. })
    }
}

impl Component for Consumable {
    type Storage = DenseVecStorage<Self>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equippable {
    pub slot: EquipmentSlot,
    pub power_bonus: i32,
    pub defense_bonus: i32,
}

impl Component for Equippable {
    type Storage = DenseVecStorage<Self>;
}

/// Bounded, ordered item container. Holds entity handles, so it is saved
/// through [`super::snapshot`] rather than serialized directly.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    pub capacity: usize,
    pub items: Vec<Entity>,
}

impl Inventory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn remove(&mut self, item: Entity) -> bool {
        match self.items.iter().position(|held| *held == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }
}

impl Component for Inventory {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Equipment {
    pub weapon: Option<Entity>,
    pub armor: Option<Entity>,
}

impl Equipment {
    pub fn slot(&self, slot: EquipmentSlot) -> Option<Entity> {
        match slot {
            EquipmentSlot::Weapon => self.weapon,
            EquipmentSlot::Armor => self.armor,
        }
    }

    pub fn slot_mut(&mut self, slot: EquipmentSlot) -> &mut Option<Entity> {
        match slot {
            EquipmentSlot::Weapon => &mut self.weapon,
            EquipmentSlot::Armor => &mut self.armor,
        }
    }

    pub fn is_equipped(&self, item: Entity) -> bool {
        self.weapon == Some(item) || self.armor == Some(item)
    }

    pub fn equipped(&self) -> impl Iterator<Item = Entity> + '_ {
        self.weapon.iter().chain(self.armor.iter()).copied()
    }
}

impl Component for Equipment {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub current_level: i32,
    pub current_xp: i32,
    pub level_up_base: i32,
    pub level_up_factor: i32,
    /// Experience awarded to whoever kills this actor.
    pub xp_given: i32,
}

impl Level {
    pub fn new(level_up_base: i32, xp_given: i32) -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            level_up_base,
            level_up_factor: 150,
            xp_given,
        }
    }

    pub fn experience_to_next_level(&self) -> i32 {
        self.level_up_base + self.current_level * self.level_up_factor
    }

    pub fn requires_level_up(&self) -> bool {
        self.current_xp > self.experience_to_next_level()
    }

    /// Consumes the threshold experience and raises the level by one.
    pub fn increase_level(&mut self) {
        self.current_xp -= self.experience_to_next_level();
        self.current_level += 1;
    }
}

impl Component for Level {
    type Storage = VecStorage<Self>;
}
