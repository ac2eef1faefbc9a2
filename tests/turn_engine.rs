mod common;

use bracket_geometry::prelude::Point;
use common::{Arena, START, STAIRS, dummy, east_of, hp, set_stats, strip_gear};
use dragondelve::{
    actions::Action,
    config::GameConfig,
    data::items::ItemTemplate,
    ecs::components::{Ai, AiKind, Consumable, Inventory, Level},
    engine::{TurnOutcome, advance_turn},
    error::EngineError,
};
use pretty_assertions::assert_eq;

const NORTH: Point = Point { x: 0, y: -1 };

#[test]
fn successful_action_advances_the_clock_by_one() {
    let mut run = Arena::new().start();
    let actor = run.player();

    let outcome = advance_turn(&mut run, &Action::Wait { actor }).unwrap();

    assert_eq!(outcome, TurnOutcome::Continue);
    assert_eq!(run.stats.turn_count, 1);
}

#[test]
fn refused_action_costs_nothing() {
    let mut run = Arena::new().start();
    let actor = run.player();
    run.ecs.set_position(actor, Point::new(1, 1)).unwrap();

    let outcome = advance_turn(
        &mut run,
        &Action::Move {
            actor,
            direction: NORTH,
        },
    )
    .unwrap();

    assert_eq!(outcome, TurnOutcome::NotConsumed);
    assert_eq!(run.stats.turn_count, 0);
    assert_eq!(run.ecs.position(actor), Some(Point::new(1, 1)));
    assert_eq!(run.log.last_text(), Some("That way is blocked."));
}

#[test]
fn moving_into_a_monster_is_blocked() {
    let mut run = Arena::new()
        .with_monster(dummy("Rat", 5, 0, 0), east_of(START))
        .start();
    let actor = run.player();
    let err = Action::Move {
        actor,
        direction: Point::new(1, 0),
    }
    .perform(&mut run)
    .unwrap_err();
    assert_eq!(err.to_string(), "That way is blocked.");
}

#[test]
fn pickup_with_full_inventory_changes_nothing() {
    let mut config = GameConfig::default();
    config.player_inventory_capacity = 2;
    let mut run = Arena::new()
        .with_item(ItemTemplate::health_potion(), START)
        .start_with(config);
    let actor = run.player();
    let before = run.ecs.inventory_items(actor);
    assert_eq!(before.len(), 2);

    let outcome = advance_turn(&mut run, &Action::PickUp { actor }).unwrap();

    assert_eq!(outcome, TurnOutcome::NotConsumed);
    assert_eq!(run.log.last_text(), Some("Your inventory is full."));
    assert_eq!(run.ecs.inventory_items(actor), before);
    assert_eq!(run.ecs.items_at(START).len(), 1);
}

#[test]
fn gold_is_banked_even_when_the_pack_is_full() {
    let mut config = GameConfig::default();
    config.player_inventory_capacity = 2;
    let mut run = Arena::new()
        .with_item(ItemTemplate::gold(20), START)
        .start_with(config);
    let actor = run.player();

    let outcome = advance_turn(&mut run, &Action::PickUp { actor }).unwrap();

    assert_eq!(outcome, TurnOutcome::Continue);
    assert_eq!(run.ecs.gold(actor), 20);
    assert_eq!(run.ecs.inventory_items(actor).len(), 2);
    assert!(run.ecs.items_at(START).is_empty());
}

#[test]
fn pickup_moves_item_from_floor_to_pack() {
    let mut run = Arena::new()
        .with_item(ItemTemplate::health_potion(), START)
        .start();
    let actor = run.player();
    let potion = run.ecs.items_at(START)[0];

    advance_turn(&mut run, &Action::PickUp { actor }).unwrap();

    assert!(run.ecs.items_at(START).is_empty());
    assert_eq!(run.ecs.position(potion), None);
    assert!(run.ecs.inventory_items(actor).contains(&potion));
    assert_eq!(run.log.last_text(), Some("You picked up the Health Potion!"));
}

#[test]
fn nothing_to_pick_up() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let err = Action::PickUp { actor }.perform(&mut run).unwrap_err();
    assert_eq!(err.to_string(), "There is nothing here to pick up.");
}

#[test]
fn stairs_only_work_on_the_descent_cell() {
    let arena = Arena::new();
    let generated = arena.floors_generated.clone();
    let mut run = arena.start();
    let actor = run.player();

    let outcome = advance_turn(&mut run, &Action::TakeStairs { actor }).unwrap();
    assert_eq!(outcome, TurnOutcome::NotConsumed);
    assert_eq!(run.log.last_text(), Some("There are no stairs here."));
    assert_eq!(run.stats.current_floor, 1);

    run.ecs.set_position(actor, STAIRS).unwrap();
    let outcome = advance_turn(&mut run, &Action::TakeStairs { actor }).unwrap();
    assert_eq!(outcome, TurnOutcome::Continue);
    assert_eq!(run.stats.current_floor, 2);
    assert_eq!(generated.get(), 2);
    assert_eq!(run.ecs.position(actor), Some(START));
    assert!(run.log.contains("You descend the staircase."));
}

#[test]
fn failed_descent_leaves_the_floor_as_it_was() {
    let mut run = Arena::new()
        .with_monster(dummy("Bat", 5, 1, 0), Point::new(9, 9))
        .with_item(ItemTemplate::health_potion(), Point::new(3, 3))
        .with_floor_limit(1)
        .start();
    let actor = run.player();
    let bat = run.ecs.actor_at(Point::new(9, 9)).unwrap();
    run.ecs.set_position(actor, STAIRS).unwrap();

    let err = advance_turn(&mut run, &Action::TakeStairs { actor }).unwrap_err();

    assert!(matches!(err, EngineError::Generation(_)));
    assert_eq!(run.stats.current_floor, 1);
    assert_eq!(run.stats.turn_count, 0);
    assert_eq!(run.ecs.position(bat), Some(Point::new(9, 9)));
    assert_eq!(run.ecs.items_at(Point::new(3, 3)).len(), 1);
    assert_eq!(run.ecs.position(actor), Some(STAIRS));
}

#[test]
fn visibility_stays_within_explored_and_explored_only_grows() {
    let mut run = Arena::new().start();
    let actor = run.player();
    for _ in 0..6 {
        let before = run.map.explored_layer().to_vec();
        advance_turn(
            &mut run,
            &Action::Bump {
                actor,
                direction: Point::new(1, 0),
            },
        )
        .unwrap();
        let visible = run.map.visible_layer();
        let explored = run.map.explored_layer();
        assert!(visible.iter().zip(explored).all(|(v, e)| !v || *e));
        assert!(before.iter().zip(explored).all(|(was, now)| !was || *now));
    }
}

#[test]
fn adjacent_monster_strikes_back() {
    let mut run = Arena::new()
        .with_monster(dummy("Wolf", 10, 12, 0), east_of(START))
        .start();
    let actor = run.player();
    strip_gear(&mut run);
    set_stats(&mut run, actor, 30, 3, 8);

    advance_turn(&mut run, &Action::Wait { actor }).unwrap();

    assert_eq!(hp(&run, actor), 26);
    assert_eq!(run.stats.times_attacked, 1);
    assert_eq!(run.stats.total_damage_taken, 4);
}

#[test]
fn distant_monster_closes_in() {
    let far = Point::new(START.x + 4, START.y);
    let mut run = Arena::new()
        .with_monster(dummy("Wolf", 10, 0, 0), far)
        .start();
    let actor = run.player();
    let wolf = run.ecs.actor_at(far).unwrap();

    advance_turn(&mut run, &Action::Wait { actor }).unwrap();

    let now = run.ecs.position(wolf).unwrap();
    assert_eq!((now.x - START.x).abs(), 3);
}

#[test]
fn refused_ai_actions_do_not_stop_the_turn() {
    let mut run = Arena::new()
        .with_monster(dummy("Bat", 10, 0, 0), Point::new(1, 1))
        .with_monster(dummy("Wolf", 10, 12, 0), east_of(START))
        .start();
    let actor = run.player();
    strip_gear(&mut run);
    set_stats(&mut run, actor, 30, 3, 8);
    let bat = run.ecs.actor_at(Point::new(1, 1)).unwrap();
    // Cornered and confused: most stumbles hit a wall and are refused.
    run.ecs
        .insert(
            bat,
            Ai {
                kind: AiKind::Confused {
                    turns_remaining: 5,
                    previous: Box::new(AiKind::Hostile),
                },
            },
        )
        .unwrap();

    for _ in 0..3 {
        advance_turn(&mut run, &Action::Wait { actor }).unwrap();
    }

    assert_eq!(run.stats.turn_count, 3);
    assert_eq!(run.stats.times_attacked, 3);
}

#[test]
fn confusion_wears_off() {
    let mut run = Arena::new()
        .with_monster(dummy("Bat", 10, 0, 0), Point::new(2, 2))
        .start();
    let actor = run.player();
    let bat = run.ecs.actor_at(Point::new(2, 2)).unwrap();
    run.ecs
        .insert(
            bat,
            Ai {
                kind: AiKind::Confused {
                    turns_remaining: 1,
                    previous: Box::new(AiKind::Hostile),
                },
            },
        )
        .unwrap();

    advance_turn(&mut run, &Action::Wait { actor }).unwrap();
    advance_turn(&mut run, &Action::Wait { actor }).unwrap();

    assert_eq!(run.ecs.get::<Ai>(bat).map(|ai| ai.kind), Some(AiKind::Hostile));
    assert!(run.log.contains("The Bat is no longer confused."));
}

#[test]
fn death_overrides_everything_else() {
    let mut run = Arena::new()
        .with_monster(dummy("Troll", 10, 40, 0), east_of(START))
        .start();
    let actor = run.player();
    set_stats(&mut run, actor, 1, 3, 0);
    run.ecs
        .update::<Level, _>(actor, |l| l.current_xp = 10_000)
        .unwrap();

    let outcome = advance_turn(&mut run, &Action::Wait { actor }).unwrap();

    assert_eq!(outcome, TurnOutcome::PlayerDied);
    assert!(run.log.contains("You died!"));
    assert_eq!(hp(&run, actor), 0);
}

#[test]
fn pending_level_up_is_reported() {
    let mut run = Arena::new().start();
    let actor = run.player();
    run.ecs
        .update::<Level, _>(actor, |l| l.current_xp = 500)
        .unwrap();

    let outcome = advance_turn(&mut run, &Action::Wait { actor }).unwrap();

    assert_eq!(outcome, TurnOutcome::LevelUp);
}

#[test]
fn equipping_swaps_the_slot_and_dropping_unequips() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let sword = run.ecs.spawn_item(&ItemTemplate::sword(), Some(START));
    advance_turn(&mut run, &Action::PickUp { actor }).unwrap();
    let dagger_power = run.ecs.power(actor);

    advance_turn(&mut run, &Action::Equip { actor, item: sword }).unwrap();
    assert!(run.log.contains("You remove the Dagger."));
    assert_eq!(run.log.last_text(), Some("You equip the Sword."));
    assert_eq!(run.ecs.power(actor), dagger_power + 2);

    advance_turn(&mut run, &Action::Drop { actor, item: sword }).unwrap();
    assert!(!run.ecs.is_equipped(actor, sword));
    assert_eq!(run.ecs.position(sword), Some(START));
    assert!(!run.ecs.inventory_items(actor).contains(&sword));
    assert_eq!(run.ecs.power(actor), dagger_power - 2);
}

#[test]
fn consumables_refuse_pointless_use() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let potion = run.ecs.spawn_item(&ItemTemplate::health_potion(), Some(START));
    let scroll = run.ecs.spawn_item(&ItemTemplate::confusion_scroll(), None);
    let fireball = run.ecs.spawn_item(&ItemTemplate::fireball_scroll(), None);
    let lightning = run.ecs.spawn_item(&ItemTemplate::lightning_scroll(), None);
    advance_turn(&mut run, &Action::PickUp { actor }).unwrap();
    run.ecs
        .update::<Inventory, _>(actor, |inv| {
            inv.items.extend([scroll, fireball, lightning])
        })
        .unwrap();

    let attempts = [
        (potion, None, "Your health is already full."),
        (scroll, Some(START), "You cannot confuse yourself!"),
        (scroll, Some(Point::new(2, 2)), "You must select an enemy to target."),
        (fireball, Some(Point::new(9, 9)), "There are no targets in the radius."),
        (lightning, None, "No enemy is close enough to strike."),
    ];
    for (item, target, message) in attempts {
        let action = Action::UseItem {
            actor,
            item,
            target,
        };
        let turn = run.stats.turn_count;
        assert_eq!(advance_turn(&mut run, &action).unwrap(), TurnOutcome::NotConsumed);
        assert_eq!(run.stats.turn_count, turn);
        assert_eq!(run.log.last_text(), Some(message));
        assert!(run.ecs.inventory_items(actor).contains(&item));
    }
}

#[test]
fn healing_potion_is_used_up() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let potion = run.ecs.spawn_item(&ItemTemplate::health_potion(), Some(START));
    advance_turn(&mut run, &Action::PickUp { actor }).unwrap();
    set_stats(&mut run, actor, 25, 3, 8);

    advance_turn(
        &mut run,
        &Action::UseItem {
            actor,
            item: potion,
            target: None,
        },
    )
    .unwrap();

    assert_eq!(hp(&run, actor), 30);
    assert!(!run.ecs.inventory_items(actor).contains(&potion));
    assert_eq!(run.ecs.get::<Consumable>(potion), None);
    assert!(run.log.contains("You consume the Health Potion, and recover 5 HP!"));
}

#[test]
fn fireball_hits_everything_in_the_blast() {
    let mut run = Arena::new()
        .with_monster(dummy("Imp", 30, 0, 0), Point::new(9, 8))
        .with_monster(dummy("Imp", 30, 0, 0), Point::new(10, 8))
        .start();
    let actor = run.player();
    let imps = [
        run.ecs.actor_at(Point::new(9, 8)).unwrap(),
        run.ecs.actor_at(Point::new(10, 8)).unwrap(),
    ];
    let fireball = run.ecs.spawn_item(&ItemTemplate::fireball_scroll(), None);
    run.ecs
        .update::<Inventory, _>(actor, |inv| {
            inv.items.push(fireball)
        })
        .unwrap();

    advance_turn(
        &mut run,
        &Action::UseItem {
            actor,
            item: fireball,
            target: Some(Point::new(9, 8)),
        },
    )
    .unwrap();

    for imp in imps {
        assert_eq!(hp(&run, imp), 16);
    }
    assert_eq!(hp(&run, actor), 30);
    assert_eq!(run.stats.turn_count, 1);
}
