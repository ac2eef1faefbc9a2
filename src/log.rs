use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Serialize};

pub mod palette {
    use bracket_terminal::prelude::RGB;

    pub fn white() -> RGB {
        RGB::from_u8(0xff, 0xff, 0xff)
    }
    pub fn welcome() -> RGB {
        RGB::from_u8(0x20, 0xa0, 0xff)
    }
    pub fn player_atk() -> RGB {
        RGB::from_u8(0xe0, 0xe0, 0xe0)
    }
    pub fn enemy_atk() -> RGB {
        RGB::from_u8(0xff, 0xc0, 0xc0)
    }
    pub fn follow_up() -> RGB {
        RGB::from_u8(0xff, 0xff, 0x00)
    }
    pub fn gold() -> RGB {
        RGB::from_u8(0xff, 0xd7, 0x00)
    }
    pub fn player_die() -> RGB {
        RGB::from_u8(0xff, 0x30, 0x30)
    }
    pub fn enemy_die() -> RGB {
        RGB::from_u8(0xff, 0xa0, 0x30)
    }
    pub fn invalid() -> RGB {
        RGB::from_u8(0xff, 0xff, 0x00)
    }
    pub fn impossible() -> RGB {
        RGB::from_u8(0x80, 0x80, 0x80)
    }
    pub fn health_recovered() -> RGB {
        RGB::from_u8(0x00, 0xff, 0x00)
    }
    pub fn status_effect() -> RGB {
        RGB::from_u8(0x3f, 0xff, 0x3f)
    }
    pub fn descend() -> RGB {
        RGB::from_u8(0x9f, 0x3f, 0xff)
    }
    pub fn needs_target() -> RGB {
        RGB::from_u8(0x3f, 0xff, 0xff)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub color: RGB,
    pub count: u32,
}

impl Message {
    /// Text with the repeat counter appended once the same line stacked.
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Player-facing message history. Consecutive identical lines stack into a
/// single entry with a counter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn add(&mut self, text: impl Into<String>, color: RGB) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.text == text {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message {
            text,
            color,
            count: 1,
        });
    }

    pub fn push(&mut self, text: impl Into<String>) {
        self.add(text, palette::white());
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.messages.last().map(|m| m.text.as_str())
    }

    pub fn contains(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m.text == text)
    }
}
