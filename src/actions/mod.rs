//! Atomic intents. Each [`Action`] either completes and consumes a turn or
//! fails with [`ActionError::Impossible`] before touching the world.

mod items;

use bracket_geometry::prelude::Point;
use specs::Entity;

use crate::{
    combat,
    engine::Run,
    error::{ActionError, ActionResult, EngineError},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Attack whatever stands in `direction`, or walk there.
    Bump { actor: Entity, direction: Point },
    Move { actor: Entity, direction: Point },
    Melee { actor: Entity, direction: Point },
    PickUp { actor: Entity },
    /// Activate a consumable, aimed at `target` when it needs a cell.
    UseItem {
        actor: Entity,
        item: Entity,
        target: Option<Point>,
    },
    Drop { actor: Entity, item: Entity },
    Equip { actor: Entity, item: Entity },
    Wait { actor: Entity },
    TakeStairs { actor: Entity },
}

impl Action {
    pub fn actor(&self) -> Entity {
        match self {
            Action::Bump { actor, .. }
            | Action::Move { actor, .. }
            | Action::Melee { actor, .. }
            | Action::PickUp { actor }
            | Action::UseItem { actor, .. }
            | Action::Drop { actor, .. }
            | Action::Equip { actor, .. }
            | Action::Wait { actor }
            | Action::TakeStairs { actor } => *actor,
        }
    }

    pub fn perform(&self, run: &mut Run) -> ActionResult {
        match *self {
            Action::Bump { actor, direction } => {
                let dest = destination(run, actor, direction)?;
                if run.ecs.actor_at(dest).is_some() {
                    Action::Melee { actor, direction }.perform(run)
                } else {
                    Action::Move { actor, direction }.perform(run)
                }
            }
            Action::Move { actor, direction } => move_actor(run, actor, direction),
            Action::Melee { actor, direction } => {
                let dest = destination(run, actor, direction)?;
                let target = run
                    .ecs
                    .actor_at(dest)
                    .ok_or_else(|| ActionError::impossible("Nothing to attack."))?;
                combat::melee(run, actor, target)?;
                Ok(())
            }
            Action::PickUp { actor } => items::pick_up(run, actor),
            Action::UseItem {
                actor,
                item,
                target,
            } => items::use_item(run, actor, item, target),
            Action::Drop { actor, item } => items::drop_item(run, actor, item),
            Action::Equip { actor, item } => items::toggle_equip(run, actor, item),
            Action::Wait { .. } => Ok(()),
            Action::TakeStairs { actor } => {
                let here = position_of(run, actor)?;
                if here != run.map.descent_cell() {
                    return Err(ActionError::impossible("There are no stairs here."));
                }
                run.descend()?;
                Ok(())
            }
        }
    }
}

fn position_of(run: &Run, actor: Entity) -> Result<Point, ActionError> {
    run.ecs
        .position(actor)
        .ok_or_else(|| EngineError::missing(actor, "Position").into())
}

fn destination(run: &Run, actor: Entity, direction: Point) -> Result<Point, ActionError> {
    let here = position_of(run, actor)?;
    Ok(Point::new(here.x + direction.x, here.y + direction.y))
}

fn move_actor(run: &mut Run, actor: Entity, direction: Point) -> ActionResult {
    let dest = destination(run, actor, direction)?;
    if !run.map.in_bounds(dest)
        || !run.map.is_walkable(dest)
        || run.ecs.blocking_entity_at(dest).is_some()
    {
        return Err(ActionError::impossible("That way is blocked."));
    }
    run.ecs.set_position(actor, dest)?;
    Ok(())
}
