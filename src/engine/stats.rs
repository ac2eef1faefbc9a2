use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Counters accumulated over one run. Only actions and the turn engine
/// mutate them; the scoring side reads a [`RunRecord`] built from them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub turn_count: u32,
    pub total_damage_dealt: i32,
    pub total_damage_taken: i32,
    pub times_attacked: u32,
    pub total_exp: i32,
    pub current_floor: u32,
    pub start: DateTime<Utc>,
    pub cleared: bool,
    pub item_bonus_gold: i32,
}

impl RunStats {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            turn_count: 0,
            total_damage_dealt: 0,
            total_damage_taken: 0,
            times_attacked: 0,
            total_exp: 0,
            current_floor: 1,
            start,
            cleared: false,
            item_bonus_gold: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalStats {
    pub max_hp: i32,
    pub power: i32,
    pub defense: i32,
}

/// Summary handed to the ranking board when a run ends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub version: String,
    pub date: DateTime<Utc>,
    pub gold: i32,
    pub bonus_from_items: i32,
    pub floor: u32,
    pub level: i32,
    pub turns: u32,
    pub time_sec: i64,
    pub total_exp: i32,
    pub damage_dealt: i32,
    pub damage_taken: i32,
    pub attacked_count: u32,
    pub stats: FinalStats,
    pub cleared: bool,
}

impl RunRecord {
    pub fn clear_mark(&self) -> char {
        if self.cleared { '*' } else { ' ' }
    }

    pub fn elapsed_label(&self) -> String {
        let (minutes, seconds) = (self.time_sec / 60, self.time_sec % 60);
        format!("{minutes}m {seconds:02}s")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
