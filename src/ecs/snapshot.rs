//! Plain-data copy of the entity store. Every entity is written with its
//! components as optionals; entity handles inside inventories and equipment
//! become indices into the entity list and are remapped on restore.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use specs::prelude::{Builder, Entity, Join, World as SpecsWorld, WorldExt};

use crate::error::EngineError;

use super::{
    EcsWorld,
    components::{
        Ai, BlocksTile, Consumable, Equipment, Equippable, Fighter, Inventory, Item, Level, Name,
        PlayerTag, Position, Renderable, Wealth,
    },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Index of the player in `entities`.
    pub player: usize,
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub position: Option<Position>,
    pub renderable: Option<Renderable>,
    pub name: Option<Name>,
    pub blocks_tile: bool,
    pub fighter: Option<Fighter>,
    pub wealth: Option<Wealth>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
    pub consumable: Option<Consumable>,
    pub equippable: Option<Equippable>,
    pub inventory: Option<InventorySnapshot>,
    pub equipment: Option<EquipmentSnapshot>,
    pub level: Option<Level>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub capacity: usize,
    pub items: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSnapshot {
    pub weapon: Option<usize>,
    pub armor: Option<usize>,
}

impl EcsWorld {
    /// Copies every live entity out of the store.
    pub fn snapshot(&self) -> Result<WorldSnapshot, EngineError> {
        let live: Vec<Entity> = {
            let entities = self.specs_world.entities();
            (&entities).join().collect()
        };
        let index: HashMap<Entity, usize> =
            live.iter().enumerate().map(|(idx, entity)| (*entity, idx)).collect();
        let index_of = |entity: Entity| {
            index
                .get(&entity)
                .copied()
                .ok_or(EngineError::DeadEntity(entity))
        };

        let mut saved = Vec::with_capacity(live.len());
        for &entity in &live {
            let inventory = match self.get::<Inventory>(entity) {
                Some(inv) => Some(InventorySnapshot {
                    capacity: inv.capacity,
                    items: inv
                        .items
                        .iter()
                        .map(|item| index_of(*item))
                        .collect::<Result<_, _>>()?,
                }),
                None => None,
            };
            let equipment = match self.get::<Equipment>(entity) {
                Some(eq) => Some(EquipmentSnapshot {
                    weapon: eq.weapon.map(index_of).transpose()?,
                    armor: eq.armor.map(index_of).transpose()?,
                }),
                None => None,
            };
            saved.push(EntitySnapshot {
                position: self.get::<Position>(entity),
                renderable: self.get::<Renderable>(entity),
                name: self.get::<Name>(entity),
                blocks_tile: self.specs_world.read_component::<BlocksTile>().contains(entity),
                fighter: self.get::<Fighter>(entity),
                wealth: self.get::<Wealth>(entity),
                ai: self.get::<Ai>(entity),
                item: self.get::<Item>(entity),
                consumable: self.get::<Consumable>(entity),
                equippable: self.get::<Equippable>(entity),
                inventory,
                equipment,
                level: self.get::<Level>(entity),
            });
        }

        Ok(WorldSnapshot {
            player: index_of(self.player)?,
            entities: saved,
        })
    }

    /// Rebuilds a store from a snapshot. Fails if an index points outside
    /// the entity list.
    pub fn restore(snapshot: &WorldSnapshot) -> Result<Self, EngineError> {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        let created: Vec<Entity> = snapshot
            .entities
            .iter()
            .map(|_| specs_world.create_entity().build())
            .collect();
        let resolve = |idx: usize| {
            created
                .get(idx)
                .copied()
                .ok_or_else(|| EngineError::Snapshot(format!("no entity at index {idx}")))
        };

        let player = resolve(snapshot.player)?;
        let mut world = Self {
            specs_world,
            player,
        };
        world.insert(player, PlayerTag)?;

        for (&entity, saved) in created.iter().zip(&snapshot.entities) {
            if let Some(c) = &saved.position {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.renderable {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.name {
                world.insert(entity, c.clone())?;
            }
            if saved.blocks_tile {
                world.insert(entity, BlocksTile)?;
            }
            if let Some(c) = &saved.fighter {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.wealth {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.ai {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.item {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.consumable {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.equippable {
                world.insert(entity, c.clone())?;
            }
            if let Some(c) = &saved.level {
                world.insert(entity, c.clone())?;
            }
            if let Some(inv) = &saved.inventory {
                let items = inv
                    .items
                    .iter()
                    .map(|idx| resolve(*idx))
                    .collect::<Result<_, _>>()?;
                world.insert(
                    entity,
                    Inventory {
                        capacity: inv.capacity,
                        items,
                    },
                )?;
            }
            if let Some(eq) = &saved.equipment {
                let equipment = Equipment {
                    weapon: eq.weapon.map(resolve).transpose()?,
                    armor: eq.armor.map(resolve).transpose()?,
                };
                world.insert(entity, equipment)?;
            }
        }
        Ok(world)
    }
}
