//! Monster behaviours. Each turn an AI actor turns its [`AiKind`] into an
//! [`Action`] and performs it like the player would.

use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg, a_star_search};
use smallvec::SmallVec;
use specs::Entity;

use crate::{
    actions::Action,
    ecs::components::{Ai, AiKind},
    engine::Run,
    error::ActionResult,
    log::palette,
    map::{EIGHT_WAY, GameMap},
};

pub fn take_turn(run: &mut Run, actor: Entity) -> ActionResult {
    let Some(ai) = run.ecs.get::<Ai>(actor) else {
        return Ok(());
    };
    match ai.kind {
        AiKind::Hostile => hostile_action(run, actor).perform(run),
        AiKind::Confused {
            turns_remaining,
            previous,
        } => {
            if turns_remaining <= 0 {
                let name = run.ecs.name(actor);
                run.ecs.insert(actor, Ai { kind: *previous })?;
                run.log.add(
                    format!("The {name} is no longer confused."),
                    palette::status_effect(),
                );
                return Ok(());
            }
            run.ecs.insert(
                actor,
                Ai {
                    kind: AiKind::Confused {
                        turns_remaining: turns_remaining - 1,
                        previous,
                    },
                },
            )?;
            let direction = EIGHT_WAY[run.rng.range(0, EIGHT_WAY.len() as i32) as usize];
            Action::Bump { actor, direction }.perform(run)
        }
    }
}

/// Chase and strike the player while standing in their sight; otherwise
/// hold still.
pub fn hostile_action(run: &Run, actor: Entity) -> Action {
    let player = run.player();
    let wait = Action::Wait { actor };
    let (Some(here), Some(target)) = (run.ecs.position(actor), run.ecs.position(player)) else {
        return wait;
    };
    if !run.ecs.is_alive(player) || !run.map.is_visible(here) {
        return wait;
    }

    let (dx, dy) = (target.x - here.x, target.y - here.y);
    if dx.abs().max(dy.abs()) <= 1 {
        return Action::Melee {
            actor,
            direction: Point::new(dx, dy),
        };
    }

    match next_step(run, here, target) {
        Some(step) => Action::Move {
            actor,
            direction: Point::new(step.x - here.x, step.y - here.y),
        },
        None => wait,
    }
}

fn next_step(run: &Run, from: Point, to: Point) -> Option<Point> {
    let blocked: HashSet<Point> = run
        .ecs
        .living_actors()
        .into_iter()
        .map(|(_, point)| point)
        .filter(|point| *point != from && *point != to)
        .collect();
    let view = Obstructed {
        map: &run.map,
        blocked,
    };
    let path = a_star_search(
        view.point2d_to_index(from),
        view.point2d_to_index(to),
        &view,
    );
    if !path.success {
        return None;
    }
    path.steps
        .get(1)
        .map(|idx| view.index_to_point2d(*idx))
}

/// The floor as seen by a pathing monster: other actors are walls.
struct Obstructed<'a> {
    map: &'a GameMap,
    blocked: HashSet<Point>,
}

impl BaseMap for Obstructed<'_> {
    fn is_opaque(&self, idx: usize) -> bool {
        self.map.is_opaque(idx)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for dir in EIGHT_WAY {
            let dest = Point::new(point.x + dir.x, point.y + dir.y);
            if self.map.is_walkable(dest) && !self.blocked.contains(&dest) {
                let cost = if dir.x != 0 && dir.y != 0 { 1.45 } else { 1.0 };
                exits.push((self.point2d_to_index(dest), cost));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Pythagoras.distance2d(p1, p2)
    }
}

impl Algorithm2D for Obstructed<'_> {
    fn dimensions(&self) -> Point {
        Point::new(self.map.width, self.map.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        self.map.in_bounds(point)
    }
}
