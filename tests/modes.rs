mod common;

use bracket_geometry::prelude::Point;
use common::{Arena, START, dummy, east_of, set_stats};
use dragondelve::{
    actions::Action,
    data::{items::ItemTemplate, monsters::MonsterTemplate},
    ecs::components::{Inventory, Level},
    engine::Run,
    modes::{
        Direction, InputEvent, InventoryPurpose, Key, Mode, Modifiers, MouseButton, Session,
        TargetKind, handle_input,
    },
    score::ScoreBoard,
};
use pretty_assertions::assert_eq;

fn press(mode: Mode, event: InputEvent, run: &mut Run) -> (Mode, Option<Action>) {
    handle_input(mode, &event, run).unwrap()
}

fn give(run: &mut Run, template: ItemTemplate) -> specs::Entity {
    let player = run.player();
    let item = run.ecs.spawn_item(&template, None);
    run.ecs
        .update::<Inventory, _>(player, |inv| inv.items.push(item))
        .unwrap();
    item
}

#[test]
fn arrows_bump_and_shifted_period_descends() {
    let mut run = Arena::new().start();
    let actor = run.player();

    let (mode, action) = press(Mode::MainPlay, InputEvent::key(Key::Dir(Direction::East)), &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(
        action,
        Some(Action::Bump {
            actor,
            direction: Point::new(1, 0)
        })
    );

    let (_, action) = press(Mode::MainPlay, InputEvent::shifted(Key::Char('.')), &mut run);
    assert_eq!(action, Some(Action::TakeStairs { actor }));

    let (_, action) = press(Mode::MainPlay, InputEvent::char('.'), &mut run);
    assert_eq!(action, Some(Action::Wait { actor }));

    let (_, action) = press(Mode::MainPlay, InputEvent::key(Key::PageDown), &mut run);
    assert_eq!(
        action,
        Some(Action::Bump {
            actor,
            direction: Point::new(1, 1)
        })
    );
}

#[test]
fn main_play_menus() {
    let mut run = Arena::new().start();
    let cases = [
        ('i', Mode::InventorySelect { purpose: InventoryPurpose::Use }),
        ('d', Mode::InventorySelect { purpose: InventoryPurpose::Drop }),
        ('c', Mode::CharacterScreen),
    ];
    for (c, expected) in cases {
        let (mode, action) = press(Mode::MainPlay, InputEvent::char(c), &mut run);
        assert_eq!(mode, expected);
        assert_eq!(action, None);
    }

    let (mode, _) = press(Mode::MainPlay, InputEvent::key(Key::Escape), &mut run);
    assert_eq!(mode, Mode::Exit);
}

#[test]
fn empty_inventory_opens_a_popup() {
    let mut run = Arena::new().start();
    let player = run.player();
    run.ecs
        .update::<Inventory, _>(player, |inv| inv.items.clear())
        .unwrap();

    let (mode, _) = press(Mode::MainPlay, InputEvent::char('i'), &mut run);
    assert_eq!(
        mode,
        Mode::Popup {
            parent: Box::new(Mode::MainPlay),
            text: "Your inventory is empty.".to_string(),
        }
    );

    let (mode, _) = press(mode, InputEvent::key(Key::Modifier), &mut run);
    assert!(matches!(mode, Mode::Popup { .. }));
    let (mode, _) = press(mode, InputEvent::char('x'), &mut run);
    assert_eq!(mode, Mode::MainPlay);
}

#[test]
fn inventory_letters_select_items() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let use_mode = Mode::InventorySelect {
        purpose: InventoryPurpose::Use,
    };
    let dagger = run.ecs.inventory_items(actor)[0];

    let (mode, action) = press(use_mode.clone(), InputEvent::char('z'), &mut run);
    assert_eq!(mode, use_mode);
    assert_eq!(action, None);
    assert_eq!(run.log.last_text(), Some("Invalid entry."));

    let (mode, action) = press(use_mode.clone(), InputEvent::char('a'), &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(action, Some(Action::Equip { actor, item: dagger }));

    let drop_mode = Mode::InventorySelect {
        purpose: InventoryPurpose::Drop,
    };
    let (_, action) = press(drop_mode, InputEvent::char('a'), &mut run);
    assert_eq!(action, Some(Action::Drop { actor, item: dagger }));

    let (mode, action) = press(use_mode, InputEvent::key(Key::Escape), &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(action, None);
}

#[test]
fn targeting_cursor_speeds_and_clamps() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let scroll = give(&mut run, ItemTemplate::confusion_scroll());

    let (mode, action) = press(
        Mode::InventorySelect {
            purpose: InventoryPurpose::Use,
        },
        InputEvent::char('c'),
        &mut run,
    );
    assert_eq!(action, None);
    assert_eq!(run.log.last_text(), Some("Select a target location."));
    assert_eq!(
        mode,
        Mode::Targeting {
            cursor: START,
            kind: TargetKind::Single { item: scroll },
        }
    );

    let (mode, _) = press(mode, InputEvent::shifted(Key::Dir(Direction::East)), &mut run);
    assert!(matches!(mode, Mode::Targeting { cursor, .. } if cursor == Point::new(10, 5)));

    let fast = InputEvent::Key {
        key: Key::Dir(Direction::East),
        mods: Modifiers::CTRL | Modifiers::ALT,
    };
    let (mode, _) = press(mode, fast, &mut run);
    assert!(matches!(mode, Mode::Targeting { cursor, .. } if cursor == Point::new(19, 5)));

    let (mode, action) = press(mode, InputEvent::key(Key::Confirm), &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(
        action,
        Some(Action::UseItem {
            actor,
            item: scroll,
            target: Some(Point::new(19, 5)),
        })
    );
}

#[test]
fn targeting_follows_the_mouse_and_accepts_clicks() {
    let mut run = Arena::new().start();
    let actor = run.player();
    let fireball = give(&mut run, ItemTemplate::fireball_scroll());
    let mode = Mode::Targeting {
        cursor: START,
        kind: TargetKind::Area {
            item: fireball,
            radius: 3,
        },
    };

    let (mode, _) = press(mode, InputEvent::MouseMove(Point::new(8, 7)), &mut run);
    assert!(matches!(mode, Mode::Targeting { cursor, .. } if cursor == Point::new(8, 7)));
    assert_eq!(run.mouse, Point::new(8, 7));

    let click = InputEvent::Click {
        cell: Point::new(9, 9),
        button: MouseButton::Left,
    };
    let (mode, action) = press(mode, click, &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(
        action,
        Some(Action::UseItem {
            actor,
            item: fireball,
            target: Some(Point::new(9, 9)),
        })
    );
}

#[test]
fn looking_around_never_acts() {
    let mut run = Arena::new().start();
    let (mode, _) = press(Mode::MainPlay, InputEvent::char('/'), &mut run);
    assert_eq!(
        mode,
        Mode::Targeting {
            cursor: START,
            kind: TargetKind::Look,
        }
    );
    let (mode, action) = press(mode, InputEvent::key(Key::Confirm), &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(action, None);
}

#[test]
fn level_up_menu_rejects_unknown_keys() {
    let mut run = Arena::new().start();
    let player = run.player();
    let power = run.ecs.power(player);

    let (mode, _) = press(Mode::LevelUp, InputEvent::char('x'), &mut run);
    assert_eq!(mode, Mode::LevelUp);
    assert_eq!(run.log.last_text(), Some("Invalid entry."));

    let click = InputEvent::Click {
        cell: START,
        button: MouseButton::Left,
    };
    let (mode, _) = press(Mode::LevelUp, click, &mut run);
    assert_eq!(mode, Mode::LevelUp);

    let (mode, _) = press(Mode::LevelUp, InputEvent::char('b'), &mut run);
    assert_eq!(mode, Mode::MainPlay);
    assert_eq!(run.ecs.power(player), power + 1);
    assert_eq!(run.log.last_text(), Some("You feel stronger!"));
    assert_eq!(run.ecs.level(player).unwrap().current_level, 2);
}

#[test]
fn history_cursor_wraps_at_both_ends() {
    let mut run = Arena::new().start();
    run.log.push("second");
    run.log.push("third");
    let last = run.log.len() as i32 - 1;

    let (mode, _) = press(Mode::MainPlay, InputEvent::char('v'), &mut run);
    assert_eq!(mode, Mode::HistoryViewer { cursor: last });

    let (mode, _) = press(mode, InputEvent::key(Key::Dir(Direction::South)), &mut run);
    assert_eq!(mode, Mode::HistoryViewer { cursor: 0 });

    let (mode, _) = press(mode, InputEvent::key(Key::Dir(Direction::North)), &mut run);
    assert_eq!(mode, Mode::HistoryViewer { cursor: last });

    let (mode, _) = press(mode, InputEvent::key(Key::Home), &mut run);
    assert_eq!(mode, Mode::HistoryViewer { cursor: 0 });

    let (mode, _) = press(mode, InputEvent::key(Key::PageDown), &mut run);
    assert_eq!(mode, Mode::HistoryViewer { cursor: last });

    let (mode, _) = press(mode, InputEvent::key(Key::Escape), &mut run);
    assert_eq!(mode, Mode::MainPlay);
}

#[test]
fn refused_item_use_keeps_the_menu_open() {
    let run = Arena::new()
        .with_item(ItemTemplate::health_potion(), START)
        .start();
    let mut session = Session::new(run, ScoreBoard::new(5));

    session.handle(&InputEvent::char('g')).unwrap();
    assert_eq!(session.run.stats.turn_count, 1);

    session.handle(&InputEvent::char('i')).unwrap();
    session.handle(&InputEvent::char('c')).unwrap();

    assert_eq!(
        session.mode,
        Mode::InventorySelect {
            purpose: InventoryPurpose::Use
        }
    );
    assert_eq!(session.run.stats.turn_count, 1);
    assert_eq!(session.run.log.last_text(), Some("Your health is already full."));
}

#[test]
fn experience_threshold_enters_level_up() {
    let run = Arena::new().start();
    let mut session = Session::new(run, ScoreBoard::new(5));
    let player = session.run.player();
    session
        .run
        .ecs
        .update::<Level, _>(player, |l| l.current_xp = 500)
        .unwrap();

    session.handle(&InputEvent::char('.')).unwrap();
    assert_eq!(session.mode, Mode::LevelUp);

    session.handle(&InputEvent::char('a')).unwrap();
    assert_eq!(session.mode, Mode::MainPlay);
    assert_eq!(session.run.ecs.fighter(player).unwrap().max_hp, 50);
}

#[test]
fn death_files_one_record_then_ranking_then_exit() {
    let run = Arena::new()
        .with_monster(dummy("Troll", 10, 40, 0), east_of(START))
        .start();
    let mut session = Session::new(run, ScoreBoard::new(5));
    let player = session.run.player();
    set_stats(&mut session.run, player, 1, 3, 0);

    session.handle(&InputEvent::char('.')).unwrap();
    assert_eq!(session.mode, Mode::GameOver);
    assert_eq!(session.scores.len(), 1);
    let record = session.record().unwrap();
    assert_eq!(record.turns, 1);
    assert!(!record.cleared);

    session.handle(&InputEvent::char('x')).unwrap();
    assert_eq!(session.mode, Mode::GameOver);

    session.handle(&InputEvent::char('r')).unwrap();
    assert_eq!(session.mode, Mode::Ranking);
    session.handle(&InputEvent::char('q')).unwrap();
    assert!(session.is_finished());
    assert_eq!(session.scores.len(), 1);
}

#[test]
fn slaying_the_boss_files_a_cleared_record_then_ranking_then_exit() {
    let run = Arena::new()
        .with_monster(MonsterTemplate::ancient_dragon(), east_of(START))
        .start();
    let mut session = Session::new(run, ScoreBoard::new(5));
    let player = session.run.player();
    set_stats(&mut session.run, player, 30, 60, 8);

    session
        .handle(&InputEvent::key(Key::Dir(Direction::East)))
        .unwrap();
    assert_eq!(session.mode, Mode::GameClear);
    assert_eq!(session.scores.len(), 1);
    let record = session.record().unwrap();
    assert!(record.cleared);
    assert_eq!(record.turns, 1);

    session.handle(&InputEvent::key(Key::Modifier)).unwrap();
    assert_eq!(session.mode, Mode::GameClear);
    session.handle(&InputEvent::char('x')).unwrap();
    assert_eq!(session.mode, Mode::Ranking);
    session.handle(&InputEvent::char('x')).unwrap();
    assert!(session.is_finished());
    assert_eq!(session.scores.len(), 1);
}

#[test]
fn new_game_after_death_starts_a_fresh_run() {
    let run = Arena::new()
        .with_monster(dummy("Troll", 10, 40, 0), east_of(START))
        .start();
    let mut session = Session::new(run, ScoreBoard::new(5));
    let player = session.run.player();
    set_stats(&mut session.run, player, 1, 3, 0);
    let seed = session.run.config.seed;

    session.handle(&InputEvent::char('.')).unwrap();
    assert_eq!(session.mode, Mode::GameOver);

    session.handle(&InputEvent::char('n')).unwrap();
    assert_eq!(session.mode, Mode::MainPlay);
    assert!(session.record().is_none());
    assert_eq!(session.scores.len(), 1);
    assert_eq!(session.run.stats.turn_count, 0);
    assert_eq!(session.run.stats.current_floor, 1);
    assert_eq!(session.run.config.seed, seed.wrapping_add(1));
    assert!(!session.run.player_is_dead());
}
