use bracket_terminal::prelude::RGB;

use crate::ecs::components::{Consumable, EquipmentSlot, Equippable};

#[derive(Clone, Debug)]
pub enum ItemKind {
    Consumable(Consumable),
    Equippable(Equippable),
}

#[derive(Clone, Debug)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub value: i32,
    pub kind: ItemKind,
    pub min_floor: u32,
    pub weight: u32,
}

impl ItemTemplate {
    pub fn health_potion() -> Self {
        Self::consumable(
            "Health Potion",
            '!',
            RGB::from_u8(127, 0, 255),
            20,
            Consumable::Healing { amount: 10 },
        )
        .rolled(0, 35)
    }

    pub fn confusion_scroll() -> Self {
        Self::consumable(
            "Confusion Scroll",
            '~',
            RGB::from_u8(207, 63, 255),
            10,
            Consumable::Confusion { turns: 30 },
        )
        .rolled(2, 10)
    }

    pub fn lightning_scroll() -> Self {
        Self::consumable(
            "Lightning Scroll",
            '~',
            RGB::from_u8(255, 255, 0),
            10,
            Consumable::Lightning {
                damage: 20,
                max_range: 5,
            },
        )
        .rolled(3, 25)
    }

    pub fn fireball_scroll() -> Self {
        Self::consumable(
            "Fireball Scroll",
            '~',
            RGB::from_u8(255, 0, 0),
            10,
            Consumable::Fireball {
                damage: 14,
                radius: 3,
            },
        )
        .rolled(4, 25)
    }

    pub fn gold(amount: i32) -> Self {
        Self::consumable(
            "Gold",
            '*',
            RGB::from_u8(255, 215, 0),
            0,
            Consumable::Gold { amount },
        )
        .rolled(0, 30)
    }

    pub fn dagger() -> Self {
        Self::equippable("Dagger", '/', RGB::from_u8(0, 191, 255), 0, EquipmentSlot::Weapon, 2, 0)
    }

    pub fn sword() -> Self {
        Self::equippable("Sword", '/', RGB::from_u8(0, 191, 255), 10, EquipmentSlot::Weapon, 4, 0)
            .rolled(4, 5)
    }

    pub fn super_sword() -> Self {
        Self::equippable("Super Sword", '/', RGB::from_u8(255, 255, 255), 10, EquipmentSlot::Weapon, 6, 0)
            .rolled(7, 4)
    }

    pub fn master_sword() -> Self {
        Self::equippable("Master Sword", '/', RGB::from_u8(96, 96, 96), 10, EquipmentSlot::Weapon, 10, 0)
            .rolled(9, 2)
    }

    pub fn leather_armor() -> Self {
        Self::equippable("Leather Armor", '[', RGB::from_u8(139, 69, 19), 0, EquipmentSlot::Armor, 0, 1)
    }

    pub fn chain_mail() -> Self {
        Self::equippable("Chain Mail", '[', RGB::from_u8(139, 69, 19), 30, EquipmentSlot::Armor, 0, 3)
            .rolled(6, 5)
    }

    /// Every template the generator may roll.
    pub fn loot_table() -> Vec<Self> {
        vec![
            Self::health_potion(),
            Self::confusion_scroll(),
            Self::lightning_scroll(),
            Self::fireball_scroll(),
            Self::gold(20),
            Self::sword(),
            Self::super_sword(),
            Self::master_sword(),
            Self::chain_mail(),
        ]
    }

    fn consumable(
        name: &'static str,
        glyph: char,
        color: RGB,
        value: i32,
        effect: Consumable,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            value,
            kind: ItemKind::Consumable(effect),
            min_floor: 0,
            weight: 0,
        }
    }

    fn equippable(
        name: &'static str,
        glyph: char,
        color: RGB,
        value: i32,
        slot: EquipmentSlot,
        power_bonus: i32,
        defense_bonus: i32,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            value,
            kind: ItemKind::Equippable(Equippable {
                slot,
                power_bonus,
                defense_bonus,
            }),
            min_floor: 0,
            weight: 0,
        }
    }

    fn rolled(mut self, min_floor: u32, weight: u32) -> Self {
        self.min_floor = min_floor;
        self.weight = weight;
        self
    }
}
