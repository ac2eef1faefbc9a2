use bitflags::bitflags;
use bracket_geometry::prelude::Point;

bitflags! {
    /// Modifier keys held while a key was pressed.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const CTRL  = 0b010;
        const ALT   = 0b100;
    }
}

impl Modifiers {
    /// Cursor speed in targeting: shift x5, ctrl x10, alt x20, multiplied
    /// together when combined.
    pub fn cursor_multiplier(self) -> i32 {
        let mut multiplier = 1;
        if self.contains(Modifiers::SHIFT) {
            multiplier *= 5;
        }
        if self.contains(Modifiers::CTRL) {
            multiplier *= 10;
        }
        if self.contains(Modifiers::ALT) {
            multiplier *= 20;
        }
        multiplier
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    West,
    East,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Direction {
    pub fn delta(self) -> Point {
        match self {
            Direction::North => Point::new(0, -1),
            Direction::South => Point::new(0, 1),
            Direction::West => Point::new(-1, 0),
            Direction::East => Point::new(1, 0),
            Direction::NorthWest => Point::new(-1, -1),
            Direction::NorthEast => Point::new(1, -1),
            Direction::SouthWest => Point::new(-1, 1),
            Direction::SouthEast => Point::new(1, 1),
        }
    }

    /// Roguelike letter keys for movement.
    pub fn from_vi_key(c: char) -> Option<Self> {
        Some(match c {
            'k' => Direction::North,
            'j' => Direction::South,
            'h' => Direction::West,
            'l' => Direction::East,
            'y' => Direction::NorthWest,
            'u' => Direction::NorthEast,
            'b' => Direction::SouthWest,
            'n' => Direction::SouthEast,
            _ => return None,
        })
    }
}

/// A decoded key. Letters arrive as [`Key::Char`] in lower case; shift is
/// reported through [`Modifiers`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Dir(Direction),
    /// Numpad 5 and friends.
    Wait,
    Confirm,
    Escape,
    PageUp,
    PageDown,
    Home,
    End,
    Char(char),
    /// A bare modifier press (shift, ctrl, alt).
    Modifier,
    Other,
}

impl Key {
    /// Home/End/PageUp/PageDown double as diagonal moves during play.
    pub fn movement(self) -> Option<Direction> {
        match self {
            Key::Dir(direction) => Some(direction),
            Key::Home => Some(Direction::NorthWest),
            Key::PageUp => Some(Direction::NorthEast),
            Key::End => Some(Direction::SouthWest),
            Key::PageDown => Some(Direction::SouthEast),
            Key::Char(c) => Direction::from_vi_key(c),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: Key, mods: Modifiers },
    Click { cell: Point, button: MouseButton },
    MouseMove(Point),
}

impl InputEvent {
    pub fn key(key: Key) -> Self {
        InputEvent::Key {
            key,
            mods: Modifiers::empty(),
        }
    }

    pub fn shifted(key: Key) -> Self {
        InputEvent::Key {
            key,
            mods: Modifiers::SHIFT,
        }
    }

    pub fn char(c: char) -> Self {
        Self::key(Key::Char(c))
    }
}
