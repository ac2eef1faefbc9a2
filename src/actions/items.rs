use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use specs::Entity;

use crate::{
    combat,
    ecs::components::{Ai, AiKind, Consumable, Equipment, Equippable, Fighter, Inventory},
    engine::Run,
    error::{ActionError, ActionResult, EngineError},
    log::palette,
};

use super::position_of;

pub(super) fn pick_up(run: &mut Run, actor: Entity) -> ActionResult {
    let here = position_of(run, actor)?;
    let found = run.ecs.items_at(here);
    let currency = found.iter().copied().find(|item| {
        run.ecs
            .get::<Consumable>(*item)
            .is_some_and(|c| c.is_currency())
    });

    if let Some(coin) = currency {
        let amount = match run.ecs.get::<Consumable>(coin) {
            Some(Consumable::Gold { amount }) => amount,
            _ => 0,
        };
        run.ecs.add_gold(actor, amount)?;
        run.ecs.delete(coin)?;
        run.log.add(format!("You picked up {amount} gold!"), palette::gold());
        return Ok(());
    }

    let Some(&item) = found.first() else {
        return Err(ActionError::impossible("There is nothing here to pick up."));
    };
    let inventory = run
        .ecs
        .get::<Inventory>(actor)
        .ok_or_else(|| EngineError::missing(actor, "Inventory"))?;
    if inventory.is_full() {
        return Err(ActionError::impossible("Your inventory is full."));
    }

    run.ecs.remove_position(item);
    run.ecs.update::<Inventory, _>(actor, |inv| inv.items.push(item))?;
    let name = run.ecs.name(item);
    run.log.push(format!("You picked up the {name}!"));
    Ok(())
}

fn ensure_carried(run: &Run, actor: Entity, item: Entity) -> ActionResult {
    if run.ecs.inventory_items(actor).contains(&item) {
        Ok(())
    } else {
        Err(ActionError::impossible(format!(
            "You are not carrying the {}.",
            run.ecs.name(item)
        )))
    }
}

pub(super) fn drop_item(run: &mut Run, actor: Entity, item: Entity) -> ActionResult {
    ensure_carried(run, actor, item)?;
    let here = position_of(run, actor)?;
    if run.ecs.is_equipped(actor, item) {
        toggle_equip(run, actor, item)?;
    }
    run.ecs.update::<Inventory, _>(actor, |inv| inv.remove(item))?;
    run.ecs.set_position(item, here)?;
    let name = run.ecs.name(item);
    run.log.push(format!("You dropped the {name}."));
    Ok(())
}

/// Equips `item`, or takes it off if it is already worn. Whatever occupied
/// the slot before is taken off first.
pub(super) fn toggle_equip(run: &mut Run, actor: Entity, item: Entity) -> ActionResult {
    ensure_carried(run, actor, item)?;
    let name = run.ecs.name(item);
    let Some(gear) = run.ecs.get::<Equippable>(item) else {
        return Err(ActionError::impossible(format!("The {name} cannot be equipped.")));
    };
    let worn = run
        .ecs
        .get::<Equipment>(actor)
        .ok_or_else(|| EngineError::missing(actor, "Equipment"))?
        .slot(gear.slot);

    if worn == Some(item) {
        run.ecs
            .update::<Equipment, _>(actor, |eq| *eq.slot_mut(gear.slot) = None)?;
        run.log.push(format!("You remove the {name}."));
        return Ok(());
    }

    if let Some(previous) = worn {
        let previous_name = run.ecs.name(previous);
        run.log.push(format!("You remove the {previous_name}."));
    }
    run.ecs
        .update::<Equipment, _>(actor, |eq| *eq.slot_mut(gear.slot) = Some(item))?;
    run.log.push(format!("You equip the {name}."));
    Ok(())
}

pub(super) fn use_item(
    run: &mut Run,
    actor: Entity,
    item: Entity,
    target: Option<Point>,
) -> ActionResult {
    let name = run.ecs.name(item);
    let Some(effect) = run.ecs.get::<Consumable>(item) else {
        return Err(ActionError::impossible(format!("The {name} cannot be used.")));
    };
    if !effect.is_currency() {
        ensure_carried(run, actor, item)?;
    }

    match effect {
        Consumable::Healing { amount } => heal(run, actor, &name, amount)?,
        Consumable::Lightning { damage, max_range } => lightning(run, actor, damage, max_range)?,
        Consumable::Confusion { turns } => confuse(run, actor, target, turns)?,
        Consumable::Fireball { damage, radius } => fireball(run, actor, target, damage, radius)?,
        Consumable::Gold { amount } => {
            run.ecs.add_gold(actor, amount)?;
            run.log.add(format!("You picked up {amount} gold!"), palette::gold());
        }
    }

    run.ecs.update::<Inventory, _>(actor, |inv| inv.remove(item))?;
    run.ecs.delete(item)?;
    Ok(())
}

fn heal(run: &mut Run, actor: Entity, name: &str, amount: i32) -> ActionResult {
    let full = run
        .ecs
        .fighter(actor)
        .ok_or_else(|| EngineError::missing(actor, "Fighter"))
        .map(|f| f.hp >= f.max_hp)?;
    if full {
        return Err(ActionError::impossible("Your health is already full."));
    }
    let recovered = run.ecs.update::<Fighter, _>(actor, |f| f.heal(amount))?;
    run.log.add(
        format!("You consume the {name}, and recover {recovered} HP!"),
        palette::health_recovered(),
    );
    Ok(())
}

fn lightning(run: &mut Run, actor: Entity, damage: i32, max_range: i32) -> ActionResult {
    let origin = position_of(run, actor)?;
    let mut closest: Option<(Entity, f32)> = None;
    for (candidate, point) in run.ecs.living_actors() {
        if candidate == actor || !run.map.is_visible(point) {
            continue;
        }
        let distance = DistanceAlg::Pythagoras.distance2d(origin, point);
        let in_reach = distance < max_range as f32 + 1.0;
        if in_reach && closest.is_none_or(|(_, best)| distance < best) {
            closest = Some((candidate, distance));
        }
    }
    let Some((target, _)) = closest else {
        return Err(ActionError::impossible("No enemy is close enough to strike."));
    };

    let dealt = run.ecs.fighter(target).map_or(damage, |f| f.spell_damage(damage));
    let name = run.ecs.name(target);
    run.log.push(format!(
        "A lightning bolt strikes the {name} with a loud thunder, for {dealt} damage!"
    ));
    combat::apply_damage(run, actor, target, dealt)?;
    Ok(())
}

fn confuse(run: &mut Run, actor: Entity, target: Option<Point>, turns: i32) -> ActionResult {
    let Some(cell) = target else {
        return Err(ActionError::impossible("You must select an enemy to target."));
    };
    if !run.map.is_visible(cell) {
        return Err(ActionError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }
    let Some(victim) = run.ecs.actor_at(cell) else {
        return Err(ActionError::impossible("You must select an enemy to target."));
    };
    if victim == actor {
        return Err(ActionError::impossible("You cannot confuse yourself!"));
    }

    let previous = run.ecs.get::<Ai>(victim).map_or(AiKind::Hostile, |ai| ai.kind);
    let name = run.ecs.name(victim);
    run.ecs.insert(
        victim,
        Ai {
            kind: AiKind::Confused {
                turns_remaining: turns,
                previous: Box::new(previous),
            },
        },
    )?;
    run.log.add(
        format!("The eyes of the {name} look vacant, as it starts to stumble around!"),
        palette::status_effect(),
    );
    Ok(())
}

fn fireball(
    run: &mut Run,
    actor: Entity,
    target: Option<Point>,
    damage: i32,
    radius: i32,
) -> ActionResult {
    let Some(center) = target else {
        return Err(ActionError::impossible("You must select an area to target."));
    };
    if !run.map.is_visible(center) {
        return Err(ActionError::impossible(
            "You cannot target an area that you cannot see.",
        ));
    }
    let caught: Vec<Entity> = run
        .ecs
        .living_actors()
        .into_iter()
        .filter(|(_, point)| DistanceAlg::Pythagoras.distance2d(center, *point) <= radius as f32)
        .map(|(entity, _)| entity)
        .collect();
    if caught.is_empty() {
        return Err(ActionError::impossible("There are no targets in the radius."));
    }

    for victim in caught {
        if !run.ecs.is_alive(victim) {
            continue;
        }
        let dealt = run.ecs.fighter(victim).map_or(damage, |f| f.spell_damage(damage));
        let name = run.ecs.name(victim);
        run.log.push(format!(
            "The {name} is engulfed in a fiery explosion, taking {dealt} damage!"
        ));
        combat::apply_damage(run, actor, victim, dealt)?;
    }
    Ok(())
}
