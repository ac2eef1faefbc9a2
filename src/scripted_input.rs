use std::{
    collections::VecDeque,
    fs,
    io::{self, BufRead},
    path::Path,
};

use crate::modes::{Direction, InputEvent, Key, Modifiers};

/// Replays keypresses from a text file, one character per key. Blank lines
/// and lines starting with `#` are skipped.
pub struct ScriptedInput {
    pending: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::from_reader(io::BufReader::new(fs::File::open(path)?))
    }

    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut pending = VecDeque::new();
        for line in reader.lines() {
            let line = line?;
            let keys = line.trim();
            if keys.starts_with('#') {
                continue;
            }
            for c in keys.chars() {
                match char_to_event(c) {
                    Some(event) => pending.push_back(event),
                    None => tracing::warn!(key = ?c, "unknown key in script"),
                }
            }
        }
        Ok(Self { pending })
    }

    pub fn next_event(&mut self) -> Option<InputEvent> {
        self.pending.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

fn char_to_event(c: char) -> Option<InputEvent> {
    let event = match c {
        '8' => InputEvent::key(Key::Dir(Direction::North)),
        '2' => InputEvent::key(Key::Dir(Direction::South)),
        '4' => InputEvent::key(Key::Dir(Direction::West)),
        '6' => InputEvent::key(Key::Dir(Direction::East)),
        '7' => InputEvent::key(Key::Home),
        '9' => InputEvent::key(Key::PageUp),
        '1' => InputEvent::key(Key::End),
        '3' => InputEvent::key(Key::PageDown),
        '5' => InputEvent::key(Key::Wait),
        '>' => InputEvent::Key {
            key: Key::Char('.'),
            mods: Modifiers::SHIFT,
        },
        '=' => InputEvent::key(Key::Confirm),
        'q' => InputEvent::key(Key::Escape),
        'A'..='Z' => InputEvent::Key {
            key: Key::Char(c.to_ascii_lowercase()),
            mods: Modifiers::SHIFT,
        },
        'a'..='z' | '.' | '/' => InputEvent::char(c),
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_and_decodes_keys() {
        let script = "# walk east then descend\n66>\n\ni a\n";
        let mut input = ScriptedInput::from_reader(script.as_bytes()).unwrap();
        assert_eq!(input.remaining(), 5);
        assert_eq!(
            input.next_event(),
            Some(InputEvent::key(Key::Dir(Direction::East)))
        );
        input.next_event();
        assert_eq!(
            input.next_event(),
            Some(InputEvent::shifted(Key::Char('.')))
        );
        assert_eq!(input.next_event(), Some(InputEvent::char('i')));
        assert_eq!(input.next_event(), Some(InputEvent::char('a')));
        assert_eq!(input.next_event(), None);
    }
}
