pub mod components;
pub mod snapshot;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Builder, Component, Entity, Join, World as SpecsWorld, WorldExt};

use crate::{
    data::{
        items::{ItemKind, ItemTemplate},
        monsters::{MonsterTemplate, PlayerTemplate},
    },
    error::EngineError,
};

use self::components::{
    Ai, AiKind, BlocksTile, Consumable, Equipment, Equippable, Fighter, Inventory, Item, Level,
    Name, PlayerTag, Position, RenderOrder, Renderable, Wealth,
};

/// Entities taken off the map by [`EcsWorld::lift_floor`], with the cells
/// they stood on.
#[derive(Debug)]
pub struct LiftedFloor(Vec<(Entity, Point)>);

impl LiftedFloor {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Entity store for one run: the player plus everything on the current
/// floor and every item held in an inventory.
///
/// An item on the floor carries a [`Position`]; an item in an inventory has
/// none and is referenced from the owner's [`Inventory`] instead, so it is
/// never owned by both at once.
pub struct EcsWorld {
    specs_world: SpecsWorld,
    player: Entity,
}

impl EcsWorld {
    pub fn new(template: &PlayerTemplate, inventory_capacity: usize) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        let player = Self::spawn_player(&mut specs_world, template, inventory_capacity);
        Self {
            specs_world,
            player,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Renderable>();
        world.register::<Name>();
        world.register::<BlocksTile>();
        world.register::<PlayerTag>();
        world.register::<Fighter>();
        world.register::<Wealth>();
        world.register::<Ai>();
        world.register::<Item>();
        world.register::<Consumable>();
        world.register::<Equippable>();
        world.register::<Inventory>();
        world.register::<Equipment>();
        world.register::<Level>();
    }

    fn spawn_player(
        world: &mut SpecsWorld,
        template: &PlayerTemplate,
        inventory_capacity: usize,
    ) -> Entity {
        world
            .create_entity()
            .with(Position {
                point: Point::new(0, 0),
            })
            .with(Renderable {
                glyph: b'@' as u16,
                color: RGB::from_u8(255, 255, 255),
                order: RenderOrder::Actor,
            })
            .with(Name {
                name: "Player".to_string(),
            })
            .with(BlocksTile)
            .with(PlayerTag)
            .with(Fighter::new(template.hp, template.power, template.defense))
            .with(Wealth::default())
            .with(Inventory::with_capacity(inventory_capacity))
            .with(Equipment::default())
            .with(Level::new(template.level_up_base, 0))
            .build()
    }

    pub fn specs(&self) -> &SpecsWorld {
        &self.specs_world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn spawn_monster(&mut self, template: &MonsterTemplate, point: Point) -> Entity {
        let mut fighter = Fighter::new(template.hp, template.power, template.defense);
        fighter.magic_resistance = template.magic_resistance;
        self.specs_world
            .create_entity()
            .with(Position { point })
            .with(Renderable {
                glyph: template.glyph as u16,
                color: template.color,
                order: RenderOrder::Actor,
            })
            .with(Name {
                name: template.name.to_string(),
            })
            .with(BlocksTile)
            .with(fighter)
            .with(Wealth::default())
            .with(Ai {
                kind: AiKind::Hostile,
            })
            .with(Inventory::with_capacity(0))
            .with(Equipment::default())
            .with(Level::new(0, template.xp_given))
            .build()
    }

    /// Creates an item. With `point == None` the item starts off the map,
    /// ready to be pushed into an inventory.
    pub fn spawn_item(&mut self, template: &ItemTemplate, point: Option<Point>) -> Entity {
        let mut builder = self
            .specs_world
            .create_entity()
            .with(Renderable {
                glyph: template.glyph as u16,
                color: template.color,
                order: RenderOrder::Item,
            })
            .with(Name {
                name: template.name.to_string(),
            })
            .with(Item {
                value: template.value,
            });
        if let Some(point) = point {
            builder = builder.with(Position { point });
        }
        match &template.kind {
            ItemKind::Consumable(effect) => builder.with(effect.clone()).build(),
            ItemKind::Equippable(gear) => builder.with(gear.clone()).build(),
        }
    }

    /// Clone of `entity`'s `C` component, if it has one.
    pub fn get<C: Component + Clone>(&self, entity: Entity) -> Option<C> {
        self.specs_world.read_component::<C>().get(entity).cloned()
    }

    /// Runs `f` on `entity`'s `C` component.
    pub fn update<C, R>(
        &mut self,
        entity: Entity,
        f: impl FnOnce(&mut C) -> R,
    ) -> Result<R, EngineError>
    where
        C: Component,
    {
        let mut storage = self.specs_world.write_component::<C>();
        let component = storage
            .get_mut(entity)
            .ok_or_else(|| EngineError::missing(entity, std::any::type_name::<C>()))?;
        Ok(f(component))
    }

    pub fn insert<C>(&mut self, entity: Entity, component: C) -> Result<(), EngineError>
    where
        C: Component,
    {
        self.specs_world
            .write_component::<C>()
            .insert(entity, component)
            .map(|_| ())
            .map_err(|_| EngineError::DeadEntity(entity))
    }

    pub fn position(&self, entity: Entity) -> Option<Point> {
        self.specs_world
            .read_component::<Position>()
            .get(entity)
            .map(|pos| pos.point)
    }

    pub fn set_position(&mut self, entity: Entity, point: Point) -> Result<(), EngineError> {
        self.specs_world
            .write_component::<Position>()
            .insert(entity, Position { point })
            .map(|_| ())
            .map_err(|_| EngineError::DeadEntity(entity))
    }

    pub fn remove_position(&mut self, entity: Entity) {
        self.specs_world.write_component::<Position>().remove(entity);
    }

    pub fn name(&self, entity: Entity) -> String {
        self.specs_world
            .read_component::<Name>()
            .get(entity)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| "something".to_string())
    }

    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) {
        if let Some(n) = self.specs_world.write_component::<Name>().get_mut(entity) {
            n.name = name.into();
        }
    }

    pub fn fighter(&self, entity: Entity) -> Option<Fighter> {
        self.specs_world
            .read_component::<Fighter>()
            .get(entity)
            .cloned()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.specs_world.is_alive(entity)
            && self
                .specs_world
                .read_component::<Fighter>()
                .get(entity)
                .is_some_and(Fighter::is_alive)
    }

    pub fn gold(&self, entity: Entity) -> i32 {
        self.specs_world
            .read_component::<Wealth>()
            .get(entity)
            .map_or(0, |w| w.gold)
    }

    pub fn add_gold(&mut self, entity: Entity, amount: i32) -> Result<(), EngineError> {
        self.update::<Wealth, _>(entity, |wealth| wealth.gold += amount)
    }

    pub fn item_value(&self, item: Entity) -> i32 {
        self.get::<Item>(item).map_or(0, |i| i.value)
    }

    /// Turns a dead actor into an inert corpse that no longer blocks or acts.
    pub fn into_corpse(&mut self, entity: Entity) -> Result<(), EngineError> {
        let name = self.name(entity);
        self.update::<Renderable, _>(entity, |r| {
            r.glyph = b'%' as u16;
            r.color = RGB::from_u8(191, 0, 0);
            r.order = RenderOrder::Corpse;
        })?;
        self.specs_world.write_component::<BlocksTile>().remove(entity);
        self.specs_world.write_component::<Ai>().remove(entity);
        self.set_name(entity, format!("remains of {name}"));
        Ok(())
    }

    pub fn level(&self, entity: Entity) -> Option<Level> {
        self.specs_world.read_component::<Level>().get(entity).cloned()
    }

    /// First entity with the blocking flag standing on `point`.
    pub fn blocking_entity_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let blockers = self.specs_world.read_component::<BlocksTile>();
        let fighters = self.specs_world.read_component::<Fighter>();
        (&entities, &positions, &blockers)
            .join()
            .filter(|(entity, pos, _)| {
                pos.point == point && fighters.get(*entity).is_none_or(Fighter::is_alive)
            })
            .map(|(entity, _, _)| entity)
            .next()
    }

    /// Living actor standing on `point`.
    pub fn actor_at(&self, point: Point) -> Option<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let fighters = self.specs_world.read_component::<Fighter>();
        (&entities, &positions, &fighters)
            .join()
            .filter(|(_, pos, fighter)| pos.point == point && fighter.is_alive())
            .map(|(entity, _, _)| entity)
            .next()
    }

    pub fn items_at(&self, point: Point) -> Vec<Entity> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let items = self.specs_world.read_component::<Item>();
        (&entities, &positions, &items)
            .join()
            .filter(|(_, pos, _)| pos.point == point)
            .map(|(entity, _, _)| entity)
            .collect()
    }

    /// Living actors on the floor, player included.
    pub fn living_actors(&self) -> Vec<(Entity, Point)> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let fighters = self.specs_world.read_component::<Fighter>();
        (&entities, &positions, &fighters)
            .join()
            .filter(|(_, _, fighter)| fighter.is_alive())
            .map(|(entity, pos, _)| (entity, pos.point))
            .collect()
    }

    /// Living, AI-driven actors other than the player.
    pub fn ai_actors(&self) -> Vec<Entity> {
        let entities = self.specs_world.entities();
        let fighters = self.specs_world.read_component::<Fighter>();
        let brains = self.specs_world.read_component::<Ai>();
        (&entities, &fighters, &brains)
            .join()
            .filter(|(entity, fighter, _)| *entity != self.player && fighter.is_alive())
            .map(|(entity, _, _)| entity)
            .collect()
    }

    fn equipment_bonus(&self, entity: Entity) -> (i32, i32) {
        let equipment = self.specs_world.read_component::<Equipment>();
        let gear = self.specs_world.read_component::<Equippable>();
        equipment
            .get(entity)
            .map(|slots| {
                slots
                    .equipped()
                    .filter_map(|item| gear.get(item))
                    .fold((0, 0), |(power, defense), g| {
                        (power + g.power_bonus, defense + g.defense_bonus)
                    })
            })
            .unwrap_or((0, 0))
    }

    /// Base power plus equipment bonuses.
    pub fn power(&self, entity: Entity) -> i32 {
        let base = self.fighter(entity).map_or(0, |f| f.base_power);
        base + self.equipment_bonus(entity).0
    }

    /// Base defense plus equipment bonuses.
    pub fn defense(&self, entity: Entity) -> i32 {
        let base = self.fighter(entity).map_or(0, |f| f.base_defense);
        base + self.equipment_bonus(entity).1
    }

    pub fn inventory_items(&self, entity: Entity) -> Vec<Entity> {
        self.specs_world
            .read_component::<Inventory>()
            .get(entity)
            .map(|inv| inv.items.clone())
            .unwrap_or_default()
    }

    pub fn is_equipped(&self, owner: Entity, item: Entity) -> bool {
        self.specs_world
            .read_component::<Equipment>()
            .get(owner)
            .is_some_and(|eq| eq.is_equipped(item))
    }

    pub fn delete(&mut self, entity: Entity) -> Result<(), EngineError> {
        self.specs_world
            .delete_entity(entity)
            .map_err(|_| EngineError::DeadEntity(entity))
    }

    /// Takes every entity on the current floor except the player off the
    /// map without deleting it. Items held in inventories have no position
    /// and are left alone.
    pub fn lift_floor(&mut self) -> LiftedFloor {
        let lifted: Vec<(Entity, Point)> = {
            let entities = self.specs_world.entities();
            let positions = self.specs_world.read_component::<Position>();
            (&entities, &positions)
                .join()
                .filter(|(entity, _)| *entity != self.player)
                .map(|(entity, pos)| (entity, pos.point))
                .collect()
        };
        let mut positions = self.specs_world.write_component::<Position>();
        for (entity, _) in &lifted {
            positions.remove(*entity);
        }
        LiftedFloor(lifted)
    }

    /// Puts a lifted floor back exactly where it was.
    pub fn restore_floor(&mut self, floor: LiftedFloor) -> Result<(), EngineError> {
        for (entity, point) in floor.0 {
            self.set_position(entity, point)?;
        }
        Ok(())
    }

    /// Deletes a lifted floor for good.
    pub fn discard_floor(&mut self, floor: LiftedFloor) -> Result<(), EngineError> {
        for (entity, _) in floor.0 {
            self.delete(entity)?;
        }
        self.specs_world.maintain();
        Ok(())
    }

    /// Visits positioned entities from the lowest render tier to the highest.
    pub fn each_renderable<F>(&self, mut f: F)
    where
        F: FnMut(Entity, Point, &Renderable),
    {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let renderables = self.specs_world.read_component::<Renderable>();
        let mut ordered: Vec<_> = (&entities, &positions, &renderables).join().collect();
        ordered.sort_by_key(|(_, _, renderable)| renderable.order);
        for (entity, pos, renderable) in ordered {
            f(entity, pos.point, renderable);
        }
    }
}
