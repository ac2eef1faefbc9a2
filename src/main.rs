use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use dragondelve::{
    config::GameConfig,
    engine::Run,
    modes::{Direction, InputEvent, Key, Modifiers, MouseButton, Session},
    render,
    score::ScoreBoard,
    scripted_input::ScriptedInput,
};

struct DragonDelveState {
    session: Session,
    script: Option<ScriptedInput>,
    last_mouse: Point,
}

impl GameState for DragonDelveState {
    fn tick(&mut self, ctx: &mut BTerm) {
        for event in self.collect_events(ctx) {
            if let Err(err) = self.session.handle(&event) {
                tracing::error!(%err, "run aborted");
                ctx.quit();
                return;
            }
        }
        if self.session.is_finished() {
            if let Some(record) = self.session.record() {
                match record.to_json() {
                    Ok(json) => tracing::info!("final record: {json}"),
                    Err(err) => tracing::warn!(%err, "could not encode final record"),
                }
            }
            ctx.quit();
            return;
        }
        render::draw_run(
            ctx,
            &self.session.run,
            &self.session.mode,
            &self.session.scores,
        );
    }
}

impl DragonDelveState {
    fn collect_events(&mut self, ctx: &BTerm) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if let Some(script) = self.script.as_mut() {
            events.extend(script.next_event());
            return events;
        }

        let (mx, my) = ctx.mouse_pos();
        let cell = Point::new(mx - render::MAP_ORIGIN.x, my - render::MAP_ORIGIN.y);
        if cell != self.last_mouse {
            self.last_mouse = cell;
            events.push(InputEvent::MouseMove(cell));
        }
        if ctx.left_click {
            events.push(InputEvent::Click {
                cell,
                button: MouseButton::Left,
            });
        }
        if let Some(key) = ctx.key {
            let mut mods = Modifiers::empty();
            mods.set(Modifiers::SHIFT, ctx.shift);
            mods.set(Modifiers::CTRL, ctx.control);
            mods.set(Modifiers::ALT, ctx.alt);
            events.push(InputEvent::Key {
                key: decode_key(key),
                mods,
            });
        }
        events
    }
}

fn decode_key(key: VirtualKeyCode) -> Key {
    use VirtualKeyCode::*;
    match key {
        Up | Numpad8 => Key::Dir(Direction::North),
        Down | Numpad2 => Key::Dir(Direction::South),
        Left | Numpad4 => Key::Dir(Direction::West),
        Right | Numpad6 => Key::Dir(Direction::East),
        Numpad7 => Key::Home,
        Numpad9 => Key::PageUp,
        Numpad1 => Key::End,
        Numpad3 => Key::PageDown,
        Home => Key::Home,
        End => Key::End,
        PageUp => Key::PageUp,
        PageDown => Key::PageDown,
        Numpad5 => Key::Wait,
        Return | NumpadEnter => Key::Confirm,
        Escape => Key::Escape,
        Period => Key::Char('.'),
        Slash => Key::Char('/'),
        LShift | RShift | LControl | RControl | LAlt | RAlt => Key::Modifier,
        A => Key::Char('a'),
        B => Key::Char('b'),
        C => Key::Char('c'),
        D => Key::Char('d'),
        E => Key::Char('e'),
        F => Key::Char('f'),
        G => Key::Char('g'),
        H => Key::Char('h'),
        I => Key::Char('i'),
        J => Key::Char('j'),
        K => Key::Char('k'),
        L => Key::Char('l'),
        M => Key::Char('m'),
        N => Key::Char('n'),
        O => Key::Char('o'),
        P => Key::Char('p'),
        Q => Key::Char('q'),
        R => Key::Char('r'),
        S => Key::Char('s'),
        T => Key::Char('t'),
        U => Key::Char('u'),
        V => Key::Char('v'),
        W => Key::Char('w'),
        X => Key::Char('x'),
        Y => Key::Char('y'),
        Z => Key::Char('z'),
        _ => Key::Other,
    }
}

fn main() -> BError {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GameConfig::from_env();
    let scores = ScoreBoard::new(config.score_capacity);
    let run = Run::new_game(config)?;

    let script = match std::env::var("DELVE_SCRIPT") {
        Ok(path) => Some(ScriptedInput::from_file(&path)?),
        Err(_) => None,
    };
    if let Some(script) = &script {
        tracing::info!(keys = script.remaining(), "replaying scripted input");
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Dragon Delve")
        .build()?;
    let state = DragonDelveState {
        session: Session::new(run, scores),
        script,
        last_mouse: Point::new(-1, -1),
    };
    main_loop(context, state)
}
