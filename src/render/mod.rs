use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;

use crate::{
    engine::Run,
    log::Message,
    map::GameMap,
    modes::{InventoryPurpose, Mode, TargetKind},
    score::ScoreBoard,
};

pub const MAP_ORIGIN: Point = Point { x: 0, y: 0 };
const HUD_TOP: i32 = 44;
const LOG_X: i32 = 21;
const LOG_WIDTH: i32 = 58;
const LOG_ROWS: i32 = 5;
const BAR_WIDTH: i32 = 20;

pub fn draw_run(ctx: &mut BTerm, run: &Run, mode: &Mode, scores: &ScoreBoard) {
    ctx.cls();
    draw_map(ctx, &run.map, MAP_ORIGIN);
    draw_entities(ctx, run);
    draw_hud(ctx, run);

    match mode {
        Mode::MainPlay | Mode::Exit => {}
        Mode::InventorySelect { purpose } => draw_inventory(ctx, run, *purpose),
        Mode::Targeting { cursor, kind } => draw_cursor(ctx, &run.map, *cursor, *kind),
        Mode::LevelUp => draw_level_up(ctx, run),
        Mode::CharacterScreen => draw_character(ctx, run),
        Mode::GameOver => draw_banner(ctx, "You died.", "[n] new game  [r] rankings  [Esc] quit"),
        Mode::GameClear => draw_banner(ctx, "The realm is saved!", "Press any key"),
        Mode::HistoryViewer { cursor } => draw_history(ctx, run, *cursor),
        Mode::Ranking => draw_ranking(ctx, scores),
        Mode::Popup { text, .. } => draw_banner(ctx, text, ""),
    }
}

pub fn draw_map(ctx: &mut BTerm, map: &GameMap, origin: Point) {
    for y in 0..map.height {
        for x in 0..map.width {
            let point = Point::new(x, y);
            let Some(tile) = map.tile(point) else {
                continue;
            };
            let (fg, bg) = if map.is_visible(point) {
                tile.light()
            } else if map.is_explored(point) {
                tile.dark()
            } else {
                (RGB::named(BLACK), RGB::named(BLACK))
            };
            let glyph = if map.is_explored(point) {
                tile.glyph()
            } else {
                b' ' as u16
            };
            ctx.set(origin.x + x, origin.y + y, fg, bg, glyph);
        }
    }
}

fn draw_entities(ctx: &mut BTerm, run: &Run) {
    run.ecs.each_renderable(|_, point, renderable| {
        if !run.map.is_visible(point) {
            return;
        }
        ctx.set(
            MAP_ORIGIN.x + point.x,
            MAP_ORIGIN.y + point.y,
            renderable.color,
            RGB::named(BLACK),
            renderable.glyph,
        );
    });
}

fn draw_hud(ctx: &mut BTerm, run: &Run) {
    let player = run.player();
    if let Some(fighter) = run.ecs.fighter(player) {
        ctx.draw_bar_horizontal(
            0,
            HUD_TOP + 1,
            BAR_WIDTH,
            fighter.hp,
            fighter.max_hp,
            RGB::from_u8(0x00, 0x60, 0x00),
            RGB::from_u8(0x40, 0x10, 0x10),
        );
        ctx.print_color(
            1,
            HUD_TOP + 1,
            RGB::named(WHITE),
            RGB::from_u8(0x00, 0x60, 0x00),
            format!("HP: {}/{}", fighter.hp, fighter.max_hp),
        );
    }
    ctx.print(0, HUD_TOP + 3, format!("Dungeon level: {}", run.stats.current_floor));
    ctx.print(0, HUD_TOP + 4, format!("Gold: {}", run.ecs.gold(player)));

    let names = names_at(run, run.mouse);
    if !names.is_empty() {
        ctx.print(LOG_X, HUD_TOP, names);
    }
    draw_log(ctx, run, LOG_X, HUD_TOP + 1, LOG_ROWS);
}

fn names_at(run: &Run, point: Point) -> String {
    if !run.map.in_bounds(point) || !run.map.is_visible(point) {
        return String::new();
    }
    let mut names = Vec::new();
    run.ecs.each_renderable(|entity, at, _| {
        if at == point {
            names.push(run.ecs.name(entity));
        }
    });
    names.join(", ")
}

/// Newest messages at the bottom of a `rows` tall panel.
pub fn draw_log(ctx: &mut BTerm, run: &Run, x: i32, y: i32, rows: i32) {
    let messages = run.log.messages();
    let shown = messages.iter().rev().take(rows as usize).rev();
    for (row, message) in shown.enumerate() {
        let text = log_line(message);
        ctx.print_color(x, y + row as i32, message.color, RGB::named(BLACK), text);
    }
}

/// A log entry cut to the panel width, counted in characters.
fn log_line(message: &Message) -> String {
    message.full_text().chars().take(LOG_WIDTH as usize).collect()
}

fn draw_frame(ctx: &mut BTerm, title: &str, width: i32, height: i32) -> (i32, i32) {
    let x = (80 - width) / 2;
    let y = 2;
    ctx.draw_box(x, y, width, height, RGB::named(WHITE), RGB::named(BLACK));
    ctx.print_color(x + 2, y, RGB::named(YELLOW), RGB::named(BLACK), title);
    (x + 1, y + 1)
}

fn draw_inventory(ctx: &mut BTerm, run: &Run, purpose: InventoryPurpose) {
    let player = run.player();
    let items = run.ecs.inventory_items(player);
    let title = match purpose {
        InventoryPurpose::Use => "Select an item to use",
        InventoryPurpose::Drop => "Select an item to drop",
    };
    let (x, y) = draw_frame(ctx, title, 40, items.len().max(1) as i32 + 1);
    for (idx, item) in items.iter().enumerate() {
        let letter = (b'a' + idx as u8) as char;
        let marker = if run.ecs.is_equipped(player, *item) { " (E)" } else { "" };
        let line = format!("({letter}) {}{marker}", run.ecs.name(*item));
        ctx.print(x, y + idx as i32, line);
    }
}

fn draw_cursor(ctx: &mut BTerm, map: &GameMap, cursor: Point, kind: TargetKind) {
    if let TargetKind::Area { radius, .. } = kind {
        ctx.draw_hollow_box(
            MAP_ORIGIN.x + cursor.x - radius - 1,
            MAP_ORIGIN.y + cursor.y - radius - 1,
            radius * 2 + 2,
            radius * 2 + 2,
            RGB::named(RED),
            RGB::named(BLACK),
        );
    }
    if map.in_bounds(cursor) {
        ctx.set_bg(
            MAP_ORIGIN.x + cursor.x,
            MAP_ORIGIN.y + cursor.y,
            RGB::named(WHITE),
        );
    }
}

fn draw_level_up(ctx: &mut BTerm, run: &Run) {
    let (x, y) = draw_frame(ctx, "Level Up", 40, 6);
    let (max_hp, power, defense) = run
        .ecs
        .fighter(run.player())
        .map_or((0, 0, 0), |f| (f.max_hp, f.base_power, f.base_defense));
    let config = &run.config;
    ctx.print(x, y, "Congratulations! You level up!");
    ctx.print(x, y + 1, "Select an attribute to increase.");
    ctx.print(
        x,
        y + 2,
        format!("a) Constitution (+{} HP, from {max_hp})", config.level_up_hp),
    );
    ctx.print(
        x,
        y + 3,
        format!("b) Strength (+{} attack, from {power})", config.level_up_power),
    );
    ctx.print(
        x,
        y + 4,
        format!("c) Agility (+{} defense, from {defense})", config.level_up_defense),
    );
}

fn draw_character(ctx: &mut BTerm, run: &Run) {
    let player = run.player();
    let (x, y) = draw_frame(ctx, "Character Information", 36, 6);
    if let Some(level) = run.ecs.level(player) {
        ctx.print(x, y, format!("Level: {}", level.current_level));
        ctx.print(x, y + 1, format!("XP: {}", level.current_xp));
        let remaining = level.experience_to_next_level() - level.current_xp;
        ctx.print(x, y + 2, format!("XP for next Level: {remaining}"));
    }
    ctx.print(x, y + 3, format!("Attack: {}", run.ecs.power(player)));
    ctx.print(x, y + 4, format!("Defense: {}", run.ecs.defense(player)));
}

fn draw_banner(ctx: &mut BTerm, title: &str, hint: &str) {
    let (x, y) = draw_frame(ctx, "", 40, 3);
    ctx.print_color(x, y, RGB::named(WHITE), RGB::named(BLACK), title);
    ctx.print_color(x, y + 1, RGB::named(GRAY), RGB::named(BLACK), hint);
}

fn draw_history(ctx: &mut BTerm, run: &Run, cursor: i32) {
    let (x, y) = draw_frame(ctx, "Message history", 76, 40);
    let messages = run.log.messages();
    let end = (cursor + 1).clamp(0, messages.len() as i32) as usize;
    let start = end.saturating_sub(38);
    for (row, message) in messages[start..end].iter().enumerate() {
        let row = y + row as i32;
        ctx.print_color(x, row, message.color, RGB::named(BLACK), message.full_text());
    }
}

fn draw_ranking(ctx: &mut BTerm, scores: &ScoreBoard) {
    let (x, y) = draw_frame(ctx, "Ranking", 60, scores.len().max(1) as i32 + 2);
    ctx.print(x, y, "Rank  Gold  Floor  Lv  Time");
    for (idx, record) in scores.records().iter().enumerate() {
        let line = format!(
            "{}{:>3}  {:>5}  {:>5}  {:>2}  {}",
            record.clear_mark(),
            idx + 1,
            record.gold,
            record.floor,
            record.level,
            record.elapsed_label()
        );
        ctx.print(x, y + 1 + idx as i32, line);
    }
}
