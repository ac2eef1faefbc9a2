//! Floor generation collaborator.
//!
//! The turn engine only relies on [`FloorGenerator`]; the rooms-and-corridors
//! generator below is the one the game ships with.

use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;

use crate::{
    config::GameConfig,
    data::{
        MAX_ITEMS_BY_FLOOR, MAX_MONSTERS_BY_FLOOR, MAX_ROOMS_BY_FLOOR, items::ItemTemplate,
        monsters::MonsterTemplate, value_for_floor,
    },
    ecs::EcsWorld,
    error::EngineError,
};

use super::{GameMap, TileKind};

/// Size and density of one floor, growing with depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorParams {
    pub floor: u32,
    pub width: i32,
    pub height: i32,
    pub max_rooms: i32,
    pub room_min_size: i32,
    pub room_max_size: i32,
    pub max_monsters_per_room: i32,
    pub max_items_per_room: i32,
    /// Name given to the boss when this floor hosts it.
    pub boss: Option<String>,
}

impl FloorParams {
    pub fn for_floor(floor: u32, config: &GameConfig) -> Self {
        let depth = floor as i32;
        Self {
            floor,
            width: (config.base_width + depth * 2).clamp(config.min_width, config.max_width),
            height: (config.base_height + depth).clamp(config.min_height, config.max_height),
            max_rooms: value_for_floor(&MAX_ROOMS_BY_FLOOR, floor),
            room_min_size: config.room_min_size,
            room_max_size: config.room_max_size,
            max_monsters_per_room: value_for_floor(&MAX_MONSTERS_BY_FLOOR, floor),
            max_items_per_room: value_for_floor(&MAX_ITEMS_BY_FLOOR, floor),
            boss: (floor == config.boss_floor).then(|| config.boss_name.clone()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedFloor {
    pub map: GameMap,
    pub player_start: Point,
}

/// Produces a populated floor. Implementations spawn the floor's monsters
/// and items into `ecs` and return the terrain plus the player's start.
pub trait FloorGenerator {
    fn generate(
        &mut self,
        params: &FloorParams,
        ecs: &mut EcsWorld,
    ) -> Result<GeneratedFloor, EngineError>;
}

pub struct RoomsAndCorridors {
    rng: RandomNumberGenerator,
}

impl RoomsAndCorridors {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RandomNumberGenerator::seeded(seed),
        }
    }

    fn carve_rooms(&mut self, params: &FloorParams) -> Vec<Rect> {
        let mut rooms: Vec<Rect> = Vec::new();
        for _ in 0..params.max_rooms {
            let room_w = self.rng.range(params.room_min_size, params.room_max_size + 1);
            let room_h = self.rng.range(params.room_min_size, params.room_max_size + 1);
            let x_max = params.width - room_w - 1;
            let y_max = params.height - room_h - 1;
            if x_max <= 1 || y_max <= 1 {
                continue;
            }
            let candidate = Rect::with_size(
                self.rng.range(1, x_max),
                self.rng.range(1, y_max),
                room_w,
                room_h,
            );
            if rooms.iter().any(|room| room.intersect(&candidate)) {
                continue;
            }
            rooms.push(candidate);
        }
        rooms
    }

    fn random_point_in(&mut self, room: &Rect) -> Point {
        Point::new(
            self.rng.range(room.x1 + 1, room.x2.max(room.x1 + 2)),
            self.rng.range(room.y1 + 1, room.y2.max(room.y1 + 2)),
        )
    }

    fn roll_monster(&mut self, floor: u32) -> Option<MonsterTemplate> {
        let pool: Vec<MonsterTemplate> = MonsterTemplate::roster()
            .into_iter()
            .filter(|m| m.weight > 0 && m.min_floor <= floor)
            .collect();
        let total: u32 = pool.iter().map(|m| m.weight).sum();
        let roll = self.roll_weight(total)?;
        pick_weighted(pool, roll, |m| m.weight)
    }

    fn roll_item(&mut self, floor: u32) -> Option<ItemTemplate> {
        let pool: Vec<ItemTemplate> = ItemTemplate::loot_table()
            .into_iter()
            .filter(|i| i.weight > 0 && i.min_floor <= floor)
            .collect();
        let total: u32 = pool.iter().map(|i| i.weight).sum();
        let roll = self.roll_weight(total)?;
        pick_weighted(pool, roll, |i| i.weight)
    }

    fn roll_weight(&mut self, total: u32) -> Option<u32> {
        (total > 0).then(|| self.rng.range(0, total))
    }

    fn populate(
        &mut self,
        params: &FloorParams,
        room: &Rect,
        ecs: &mut EcsWorld,
        reserved: &[Point],
    ) {
        let monsters = self.rng.range(0, params.max_monsters_per_room + 1);
        let items = self.rng.range(0, params.max_items_per_room + 1);

        for _ in 0..monsters {
            let point = self.random_point_in(room);
            if reserved.contains(&point) || ecs.blocking_entity_at(point).is_some() {
                continue;
            }
            if let Some(template) = self.roll_monster(params.floor) {
                ecs.spawn_monster(&template, point);
            }
        }

        for _ in 0..items {
            let point = self.random_point_in(room);
            if reserved.contains(&point) || !ecs.items_at(point).is_empty() {
                continue;
            }
            if let Some(template) = self.roll_item(params.floor) {
                ecs.spawn_item(&template, Some(point));
            }
        }
    }
}

fn pick_weighted<T>(pool: Vec<T>, mut roll: u32, weight: impl Fn(&T) -> u32) -> Option<T> {
    for entry in pool {
        let w = weight(&entry);
        if roll < w {
            return Some(entry);
        }
        roll -= w;
    }
    None
}

/// Cells of an L-shaped tunnel from `start` to `end`, both included. The
/// bend sits at `(end.x, start.y)` or, with `vertical_first`, at
/// `(start.x, end.y)`.
pub fn tunnel(start: Point, end: Point, vertical_first: bool) -> Vec<Point> {
    let corner = if vertical_first {
        Point::new(start.x, end.y)
    } else {
        Point::new(end.x, start.y)
    };
    let mut cells = straight(start, corner);
    cells.extend(straight(corner, end).into_iter().skip(1));
    cells
}

fn straight(from: Point, to: Point) -> Vec<Point> {
    let steps = (to.x - from.x).abs().max((to.y - from.y).abs());
    let (sx, sy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
    (0..=steps)
        .map(|i| Point::new(from.x + sx * i, from.y + sy * i))
        .collect()
}

impl FloorGenerator for RoomsAndCorridors {
    fn generate(
        &mut self,
        params: &FloorParams,
        ecs: &mut EcsWorld,
    ) -> Result<GeneratedFloor, EngineError> {
        let rooms = self.carve_rooms(params);
        let (Some(first), Some(last)) = (rooms.first(), rooms.last()) else {
            return Err(EngineError::Generation(format!(
                "no room fits a {}x{} floor",
                params.width, params.height
            )));
        };
        let player_start = first.center();
        let stairs = last.center();

        let mut map = GameMap::new(params.width, params.height);
        for room in &rooms {
            room.for_each(|pt| map.set_tile(pt, TileKind::Floor));
        }
        for window in rooms.windows(2) {
            let vertical_first = self.rng.range(0, 2) == 0;
            for pt in tunnel(window[0].center(), window[1].center(), vertical_first) {
                map.set_tile(pt, TileKind::Floor);
            }
        }
        map.place_downstairs(stairs);

        let reserved = [player_start, stairs];
        for room in rooms.iter().skip(1) {
            self.populate(params, room, ecs, &reserved);
        }

        if let Some(name) = &params.boss {
            let lair = self.random_point_in(last);
            let lair = if reserved.contains(&lair) || ecs.blocking_entity_at(lair).is_some() {
                Point::new(stairs.x, stairs.y - 1)
            } else {
                lair
            };
            let dragon = ecs.spawn_monster(&MonsterTemplate::ancient_dragon(), lair);
            ecs.set_name(dragon, name.clone());
            tracing::info!(floor = params.floor, "boss placed at {},{}", lair.x, lair.y);
        }

        tracing::debug!(
            floor = params.floor,
            rooms = rooms.len(),
            "generated {}x{} floor",
            params.width,
            params.height
        );

        Ok(GeneratedFloor { map, player_start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::monsters::PlayerTemplate;

    #[test]
    fn floor_dimensions_grow_and_clamp() {
        let config = GameConfig::default();
        let first = FloorParams::for_floor(1, &config);
        assert_eq!((first.width, first.height), (42, 26));
        let deep = FloorParams::for_floor(40, &config);
        assert_eq!((deep.width, deep.height), (80, 43));
        assert!(deep.max_rooms > first.max_rooms);
        assert_eq!(first.boss, None);
        assert_eq!(
            FloorParams::for_floor(config.boss_floor, &config).boss,
            Some(config.boss_name.clone())
        );
    }

    #[test]
    fn tunnels_bend_once_and_touch_both_ends() {
        let (a, b) = (Point::new(2, 2), Point::new(5, 4));
        let flat = tunnel(a, b, false);
        assert_eq!(flat.first(), Some(&a));
        assert_eq!(flat.last(), Some(&b));
        assert!(flat.contains(&Point::new(5, 2)));
        assert_eq!(flat.len(), 6);
        assert!(tunnel(a, b, true).contains(&Point::new(2, 4)));
        assert_eq!(tunnel(a, a, true), vec![a]);
    }

    #[test]
    fn generated_floor_has_reachable_stairs_and_start() {
        let config = GameConfig::default().with_seed(7);
        let mut ecs = EcsWorld::new(&PlayerTemplate::default(), 26);
        let mut generator = RoomsAndCorridors::seeded(config.seed);
        let floor = generator
            .generate(&FloorParams::for_floor(1, &config), &mut ecs)
            .unwrap();
        assert!(floor.map.is_walkable(floor.player_start));
        assert!(floor.map.is_walkable(floor.map.descent_cell()));
        assert_eq!(
            floor.map.tile(floor.map.descent_cell()),
            Some(TileKind::DownStairs)
        );
    }
}
