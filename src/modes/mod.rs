//! Input modes. Exactly one [`Mode`] is active; [`handle_input`] turns one
//! logical input into the next mode and, possibly, an [`Action`].

pub mod input;
mod session;

use bracket_geometry::prelude::Point;
use specs::Entity;

use crate::{
    actions::Action,
    ecs::components::{Consumable, Equippable},
    engine::{LevelUpChoice, Run},
    error::EngineError,
    log::palette,
};

pub use self::input::{Direction, InputEvent, Key, Modifiers, MouseButton};
pub use self::session::Session;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InventoryPurpose {
    Use,
    Drop,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TargetKind {
    /// Free look; confirming just returns to play.
    Look,
    Single { item: Entity },
    Area { item: Entity, radius: i32 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mode {
    MainPlay,
    InventorySelect { purpose: InventoryPurpose },
    Targeting { cursor: Point, kind: TargetKind },
    LevelUp,
    CharacterScreen,
    GameOver,
    GameClear,
    HistoryViewer { cursor: i32 },
    Ranking,
    /// Message drawn over `parent`; any key returns to it.
    Popup { parent: Box<Mode>, text: String },
    Exit,
}

pub type Transition = (Mode, Option<Action>);

/// One step of the mode machine. An action returned here has not been
/// performed yet; the returned mode is the one to use if it succeeds.
pub fn handle_input(
    mode: Mode,
    event: &InputEvent,
    run: &mut Run,
) -> Result<Transition, EngineError> {
    if let InputEvent::MouseMove(cell) = *event {
        if run.map.in_bounds(cell) {
            run.mouse = cell;
        }
        return Ok(match mode {
            Mode::Targeting { kind, .. } if run.map.in_bounds(cell) => {
                (Mode::Targeting { cursor: cell, kind }, None)
            }
            other => (other, None),
        });
    }

    Ok(match mode {
        Mode::MainPlay => main_play(event, run),
        Mode::InventorySelect { purpose } => inventory_select(purpose, event, run),
        Mode::Targeting { cursor, kind } => targeting(cursor, kind, event, run),
        Mode::LevelUp => level_up(event, run)?,
        Mode::CharacterScreen => exit_on_any(Mode::CharacterScreen, event),
        Mode::GameOver => match key_of(event) {
            Some(Key::Char('n')) => {
                let seed = run.config.seed.wrapping_add(1);
                *run = Run::new_game(run.config.clone().with_seed(seed))?;
                (Mode::MainPlay, None)
            }
            Some(Key::Char('r')) => (Mode::Ranking, None),
            Some(Key::Escape) => (Mode::Exit, None),
            _ => (Mode::GameOver, None),
        },
        Mode::GameClear => match key_of(event) {
            Some(Key::Modifier) | None => (Mode::GameClear, None),
            Some(_) => (Mode::Ranking, None),
        },
        Mode::HistoryViewer { cursor } => history(cursor, event, run),
        Mode::Ranking => match key_of(event) {
            Some(Key::Modifier) | None => (Mode::Ranking, None),
            Some(_) => (Mode::Exit, None),
        },
        Mode::Popup { parent, text } => match key_of(event) {
            Some(Key::Modifier) | None => (Mode::Popup { parent, text }, None),
            Some(_) => (*parent, None),
        },
        Mode::Exit => (Mode::Exit, None),
    })
}

fn key_of(event: &InputEvent) -> Option<Key> {
    match *event {
        InputEvent::Key { key, .. } => Some(key),
        _ => None,
    }
}

/// Shared "any key or click leaves" behaviour of the ask-user modes.
fn exit_on_any(current: Mode, event: &InputEvent) -> Transition {
    match event {
        InputEvent::Key {
            key: Key::Modifier, ..
        }
        | InputEvent::MouseMove(_) => (current, None),
        _ => (Mode::MainPlay, None),
    }
}

fn main_play(event: &InputEvent, run: &mut Run) -> Transition {
    let InputEvent::Key { key, mods } = *event else {
        return (Mode::MainPlay, None);
    };
    let actor = run.player();

    if (key == Key::Char('.') && mods.contains(Modifiers::SHIFT)) || key == Key::Char('>') {
        return (Mode::MainPlay, Some(Action::TakeStairs { actor }));
    }
    if let Some(direction) = key.movement() {
        let action = Action::Bump {
            actor,
            direction: direction.delta(),
        };
        return (Mode::MainPlay, Some(action));
    }

    match key {
        Key::Wait | Key::Char('.') => (Mode::MainPlay, Some(Action::Wait { actor })),
        Key::Escape => (Mode::Exit, None),
        Key::Char('g') => (Mode::MainPlay, Some(Action::PickUp { actor })),
        Key::Char('i') => open_inventory(InventoryPurpose::Use, run),
        Key::Char('d') => open_inventory(InventoryPurpose::Drop, run),
        Key::Char('c') => (Mode::CharacterScreen, None),
        Key::Char('v') => {
            let last = run.log.len() as i32 - 1;
            (Mode::HistoryViewer { cursor: last.max(0) }, None)
        }
        Key::Char('/') => {
            let cursor = run.ecs.position(actor).unwrap_or(run.mouse);
            (
                Mode::Targeting {
                    cursor,
                    kind: TargetKind::Look,
                },
                None,
            )
        }
        _ => (Mode::MainPlay, None),
    }
}

fn open_inventory(purpose: InventoryPurpose, run: &Run) -> Transition {
    if run.ecs.inventory_items(run.player()).is_empty() {
        let popup = Mode::Popup {
            parent: Box::new(Mode::MainPlay),
            text: "Your inventory is empty.".to_string(),
        };
        return (popup, None);
    }
    (Mode::InventorySelect { purpose }, None)
}

fn inventory_select(purpose: InventoryPurpose, event: &InputEvent, run: &mut Run) -> Transition {
    let current = Mode::InventorySelect { purpose };
    let Some(Key::Char(letter)) = key_of(event) else {
        return exit_on_any(current, event);
    };
    if !letter.is_ascii_lowercase() {
        return (Mode::MainPlay, None);
    }

    let index = (letter as u8 - b'a') as usize;
    let actor = run.player();
    let Some(item) = run.ecs.inventory_items(actor).get(index).copied() else {
        run.log.add("Invalid entry.", palette::invalid());
        return (current, None);
    };

    match purpose {
        InventoryPurpose::Drop => (Mode::MainPlay, Some(Action::Drop { actor, item })),
        InventoryPurpose::Use => select_item(actor, item, run),
    }
}

fn select_item(actor: Entity, item: Entity, run: &mut Run) -> Transition {
    let cursor = run.ecs.position(actor).unwrap_or(run.mouse);
    match run.ecs.get::<Consumable>(item) {
        Some(Consumable::Confusion { .. }) => {
            run.log.add("Select a target location.", palette::needs_target());
            let kind = TargetKind::Single { item };
            (Mode::Targeting { cursor, kind }, None)
        }
        Some(Consumable::Fireball { radius, .. }) => {
            run.log.add("Select a target location.", palette::needs_target());
            let kind = TargetKind::Area { item, radius };
            (Mode::Targeting { cursor, kind }, None)
        }
        None if run.ecs.get::<Equippable>(item).is_some() => {
            (Mode::MainPlay, Some(Action::Equip { actor, item }))
        }
        _ => {
            let action = Action::UseItem {
                actor,
                item,
                target: None,
            };
            (Mode::MainPlay, Some(action))
        }
    }
}

fn targeting(cursor: Point, kind: TargetKind, event: &InputEvent, run: &Run) -> Transition {
    let current = Mode::Targeting { cursor, kind };
    match *event {
        InputEvent::Key { key, mods } => {
            if let Some(direction) = key.movement() {
                let delta = direction.delta();
                let speed = mods.cursor_multiplier();
                let moved = Point::new(cursor.x + delta.x * speed, cursor.y + delta.y * speed);
                let cursor = run.map.clamp(moved);
                return (Mode::Targeting { cursor, kind }, None);
            }
            match key {
                Key::Confirm => confirm_target(cursor, kind, run),
                _ => exit_on_any(current, event),
            }
        }
        InputEvent::Click {
            cell,
            button: MouseButton::Left,
        } if run.map.in_bounds(cell) => confirm_target(cell, kind, run),
        _ => exit_on_any(current, event),
    }
}

fn confirm_target(cell: Point, kind: TargetKind, run: &Run) -> Transition {
    let actor = run.player();
    let item = match kind {
        TargetKind::Look => return (Mode::MainPlay, None),
        TargetKind::Single { item } | TargetKind::Area { item, .. } => item,
    };
    let action = Action::UseItem {
        actor,
        item,
        target: Some(cell),
    };
    (Mode::MainPlay, Some(action))
}

fn level_up(event: &InputEvent, run: &mut Run) -> Result<Transition, EngineError> {
    let choice = match key_of(event) {
        None | Some(Key::Modifier) => return Ok((Mode::LevelUp, None)),
        Some(Key::Char('a')) => LevelUpChoice::Constitution,
        Some(Key::Char('b')) => LevelUpChoice::Strength,
        Some(Key::Char('c')) => LevelUpChoice::Agility,
        Some(_) => {
            run.log.add("Invalid entry.", palette::invalid());
            return Ok((Mode::LevelUp, None));
        }
    };
    run.apply_level_up(choice)?;
    let next = if run.level_up_pending() {
        Mode::LevelUp
    } else {
        Mode::MainPlay
    };
    Ok((next, None))
}

fn history(cursor: i32, event: &InputEvent, run: &Run) -> Transition {
    let length = run.log.len() as i32;
    let last = (length - 1).max(0);
    let adjust = match key_of(event) {
        Some(Key::Dir(Direction::North)) => -1,
        Some(Key::Dir(Direction::South)) => 1,
        Some(Key::PageUp) => -run.config.history_page,
        Some(Key::PageDown) => run.config.history_page,
        Some(Key::Home) => return (Mode::HistoryViewer { cursor: 0 }, None),
        Some(Key::End) => return (Mode::HistoryViewer { cursor: last }, None),
        Some(Key::Modifier) | None => return (Mode::HistoryViewer { cursor }, None),
        Some(_) => return (Mode::MainPlay, None),
    };

    let cursor = if adjust < 0 && cursor == 0 {
        last
    } else if adjust > 0 && cursor == last {
        0
    } else {
        (cursor + adjust).clamp(0, last)
    };
    (Mode::HistoryViewer { cursor }, None)
}
