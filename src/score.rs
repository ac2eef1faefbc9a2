use serde::{Deserialize, Serialize};

use crate::engine::RunRecord;

/// Best runs ordered by gold, richest first. Ties keep arrival order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    capacity: usize,
    records: Vec<RunRecord>,
}

impl ScoreBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: Vec::new(),
        }
    }

    /// Files `record` and returns its rank, or `None` if it did not make
    /// the board.
    pub fn insert(&mut self, record: RunRecord) -> Option<usize> {
        let rank = self
            .records
            .iter()
            .position(|existing| existing.gold < record.gold)
            .unwrap_or(self.records.len());
        if rank >= self.capacity {
            return None;
        }
        self.records.insert(rank, record);
        self.records.truncate(self.capacity);
        Some(rank)
    }

    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
