//! Shared fixtures: a walled, fully lit arena with hand-placed contents.
#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use bracket_geometry::prelude::Point;
use dragondelve::{
    config::GameConfig,
    data::{items::ItemTemplate, monsters::MonsterTemplate},
    ecs::{
        EcsWorld,
        components::{Equipment, Fighter},
    },
    engine::Run,
    error::EngineError,
    map::{
        GameMap, TileKind,
        generation::{FloorGenerator, FloorParams, GeneratedFloor},
    },
};
use specs::Entity;

pub const START: Point = Point { x: 5, y: 5 };
pub const STAIRS: Point = Point { x: 14, y: 5 };

/// Generator that always builds the same open room. Monsters and items are
/// placed on the first floor only.
pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub monsters: Vec<(MonsterTemplate, Point)>,
    pub items: Vec<(ItemTemplate, Point)>,
    pub floors_generated: Rc<Cell<u32>>,
    /// Generation fails once this many floors have been built.
    pub floor_limit: Option<u32>,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            width: 20,
            height: 12,
            monsters: Vec::new(),
            items: Vec::new(),
            floors_generated: Rc::new(Cell::new(0)),
            floor_limit: None,
        }
    }

    pub fn with_floor_limit(mut self, limit: u32) -> Self {
        self.floor_limit = Some(limit);
        self
    }

    pub fn with_monster(mut self, template: MonsterTemplate, at: Point) -> Self {
        self.monsters.push((template, at));
        self
    }

    pub fn with_item(mut self, template: ItemTemplate, at: Point) -> Self {
        self.items.push((template, at));
        self
    }

    pub fn start(self) -> Run {
        self.start_with(GameConfig::default())
    }

    pub fn start_with(self, config: GameConfig) -> Run {
        Run::with_generator(config, Box::new(self)).expect("arena always generates")
    }
}

impl FloorGenerator for Arena {
    fn generate(
        &mut self,
        _params: &FloorParams,
        ecs: &mut EcsWorld,
    ) -> Result<GeneratedFloor, EngineError> {
        if self.floor_limit.is_some_and(|limit| self.floors_generated.get() >= limit) {
            return Err(EngineError::Generation("arena floor limit reached".to_string()));
        }
        let mut map = GameMap::new(self.width, self.height);
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                map.set_tile(Point::new(x, y), TileKind::Floor);
            }
        }
        map.place_downstairs(STAIRS);

        for (template, at) in std::mem::take(&mut self.monsters) {
            ecs.spawn_monster(&template, at);
        }
        for (template, at) in std::mem::take(&mut self.items) {
            ecs.spawn_item(&template, Some(at));
        }
        self.floors_generated.set(self.floors_generated.get() + 1);

        Ok(GeneratedFloor {
            map,
            player_start: START,
        })
    }
}

/// A monster with exactly the given stats and no experience value.
pub fn dummy(name: &'static str, hp: i32, power: i32, defense: i32) -> MonsterTemplate {
    let mut template = MonsterTemplate::roster()[0].clone();
    template.name = name;
    template.hp = hp;
    template.power = power;
    template.defense = defense;
    template.xp_given = 0;
    template
}

pub fn east_of(point: Point) -> Point {
    Point::new(point.x + 1, point.y)
}

/// Takes off the starting gear so power and defense equal the base stats.
pub fn strip_gear(run: &mut Run) {
    let player = run.player();
    run.ecs
        .update::<Equipment, _>(player, |eq| *eq = Equipment::default())
        .unwrap();
}

pub fn set_stats(run: &mut Run, entity: Entity, hp: i32, power: i32, defense: i32) {
    run.ecs
        .update::<Fighter, _>(entity, |f| {
            f.max_hp = f.max_hp.max(hp);
            f.hp = hp;
            f.base_power = power;
            f.base_defense = defense;
        })
        .unwrap();
}

pub fn hp(run: &Run, entity: Entity) -> i32 {
    run.ecs.fighter(entity).map_or(0, |f| f.hp)
}
