//! Melee resolution and its consequences: damage, follow-up strikes,
//! death, experience and the boss clear.

use specs::Entity;

use crate::{
    ecs::components::{Fighter, Level},
    engine::Run,
    error::EngineError,
    log::palette,
};

/// Damage dealt for `power - defense == diff`.
///
/// A positive difference is dealt in full. Up to `min_damage_window` points
/// of deficit still scratch for one; anything worse deals nothing.
pub fn damage_for(diff: i32, min_damage_window: i32) -> i32 {
    if diff > 0 {
        diff
    } else if diff >= -min_damage_window {
        1
    } else {
        0
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MeleeOutcome {
    pub damage: i32,
    /// Damage of the player's bonus strike, zero when it did not fire.
    pub follow_up: i32,
    pub killed: bool,
}

impl MeleeOutcome {
    pub fn total(&self) -> i32 {
        self.damage + self.follow_up
    }
}

/// `attacker` hits `target` once, plus a single follow-up when the player
/// lands a heavy blow that leaves the target standing.
pub fn melee(
    run: &mut Run,
    attacker: Entity,
    target: Entity,
) -> Result<MeleeOutcome, EngineError> {
    let player = run.player();
    let diff = run.ecs.power(attacker) - run.ecs.defense(target);
    let damage = damage_for(diff, run.config.min_damage_window);

    if target == player {
        run.stats.times_attacked += 1;
    }

    let target_name = run.ecs.name(target);
    let description = format!("{} attacks {target_name}", capitalize(&run.ecs.name(attacker)));
    let color = if attacker == player {
        palette::player_atk()
    } else {
        palette::enemy_atk()
    };

    let mut outcome = MeleeOutcome {
        damage,
        ..MeleeOutcome::default()
    };
    if damage == 0 {
        run.log.add(format!("{description} but does no damage."), color);
        return Ok(outcome);
    }

    run.log.add(format!("{description} for {damage} hit points."), color);
    if target == player {
        run.stats.total_damage_taken += damage;
    }
    if attacker == player {
        run.stats.total_damage_dealt += damage;
    }
    let standing = run.ecs.update::<Fighter, _>(target, |f| {
        f.take_damage(damage);
        f.is_alive()
    })?;

    if attacker == player && damage >= run.config.follow_up_threshold && standing {
        run.log.add(
            format!("Follow-up attack! {target_name} for {damage} damage!"),
            palette::follow_up(),
        );
        run.ecs.update::<Fighter, _>(target, |f| f.take_damage(damage))?;
        run.stats.total_damage_dealt += damage;
        outcome.follow_up = damage;
    }

    if !run.ecs.fighter(target).is_some_and(|f| f.is_alive()) {
        die(run, target, attacker)?;
        outcome.killed = true;
    }
    Ok(outcome)
}

/// Non-melee damage dealt by `source` (spells). Returns whether `target`
/// died.
pub fn apply_damage(
    run: &mut Run,
    source: Entity,
    target: Entity,
    amount: i32,
) -> Result<bool, EngineError> {
    let standing = run.ecs.update::<Fighter, _>(target, |f| {
        f.take_damage(amount);
        f.is_alive()
    })?;
    if !standing {
        die(run, target, source)?;
    }
    Ok(!standing)
}

fn die(run: &mut Run, entity: Entity, killer: Entity) -> Result<(), EngineError> {
    let name = run.ecs.name(entity);
    let player = run.player();
    if entity == player {
        run.log.add("You died!", palette::player_die());
        tracing::info!(turn = run.stats.turn_count, "player died");
    } else {
        run.log.add(format!("{name} is dead!"), palette::enemy_die());
    }
    let xp = run.ecs.level(entity).map_or(0, |l| l.xp_given);
    run.ecs.into_corpse(entity)?;

    if entity != player {
        award_experience(run, xp)?;
        if name == run.config.boss_name {
            run.boss_slayer = Some(killer);
        }
    }
    Ok(())
}

fn award_experience(run: &mut Run, xp: i32) -> Result<(), EngineError> {
    if xp <= 0 {
        return Ok(());
    }
    let player = run.player();
    let level = run.ecs.update::<Level, _>(player, |l| {
        l.current_xp += xp;
        l.clone()
    })?;
    run.stats.total_exp += xp;
    run.log.push(format!("You gain {xp} experience points."));
    if level.requires_level_up() {
        run.log.push(format!("You advance to level {}!", level.current_level + 1));
    }
    Ok(())
}

/// Settles a boss death recorded during the last action. A player who died
/// in the same action does not clear the game.
pub fn settle_boss_death(run: &mut Run) -> Result<(), EngineError> {
    let Some(slayer) = run.boss_slayer.take() else {
        return Ok(());
    };
    if run.player_is_dead() {
        tracing::info!("boss and player fell together; no clear");
        return Ok(());
    }
    clear_game(run, slayer)
}

/// Ends the run in victory: everything `slayer` carries is sold for a gold
/// bonus credited to them. Fires at most once per run.
pub fn clear_game(run: &mut Run, slayer: Entity) -> Result<(), EngineError> {
    if run.stats.cleared {
        return Ok(());
    }
    run.log.add(
        format!("The {} falls! You have saved the realm!", run.config.boss_name),
        palette::gold(),
    );
    let bonus: i32 = run
        .ecs
        .inventory_items(slayer)
        .into_iter()
        .map(|item| run.ecs.item_value(item))
        .sum();
    run.ecs.add_gold(slayer, bonus)?;
    run.stats.item_bonus_gold = bonus;
    run.stats.cleared = true;
    run.log.add(format!("Items sold for {bonus}G bonus!"), palette::gold());
    tracing::info!(bonus, turn = run.stats.turn_count, "game cleared");
    Ok(())
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_policy_breakpoints() {
        assert_eq!(damage_for(5, 4), 5);
        assert_eq!(damage_for(0, 4), 1);
        assert_eq!(damage_for(-4, 4), 1);
        assert_eq!(damage_for(-5, 4), 0);
    }

    #[test]
    fn capitalizes_only_the_first_letter() {
        assert_eq!(capitalize("fancy rat"), "Fancy rat");
        assert_eq!(capitalize(""), "");
    }
}
