use crate::{
    engine::{Run, RunRecord, TurnOutcome, advance_turn},
    error::EngineError,
    score::ScoreBoard,
};

use super::{InputEvent, Mode, handle_input};

/// A run plus the active mode: feeds input through the mode machine and
/// hands the resulting actions to the turn engine.
pub struct Session {
    pub run: Run,
    pub mode: Mode,
    pub scores: ScoreBoard,
    record: Option<RunRecord>,
}

impl Session {
    pub fn new(run: Run, scores: ScoreBoard) -> Self {
        Self {
            run,
            mode: Mode::MainPlay,
            scores,
            record: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.mode == Mode::Exit
    }

    /// The record filed when the run ended, if it has.
    pub fn record(&self) -> Option<&RunRecord> {
        self.record.as_ref()
    }

    pub fn handle(&mut self, event: &InputEvent) -> Result<(), EngineError> {
        let current = std::mem::replace(&mut self.mode, Mode::Exit);
        let (next, action) = handle_input(current.clone(), event, &mut self.run)?;
        let Some(action) = action else {
            if current == Mode::GameOver && next == Mode::MainPlay {
                self.record = None;
            }
            self.mode = next;
            return Ok(());
        };

        self.mode = match advance_turn(&mut self.run, &action)? {
            TurnOutcome::NotConsumed => current,
            TurnOutcome::Continue => next,
            TurnOutcome::LevelUp => Mode::LevelUp,
            TurnOutcome::PlayerDied => {
                self.file_record();
                Mode::GameOver
            }
            TurnOutcome::Cleared => {
                self.file_record();
                Mode::GameClear
            }
        };
        Ok(())
    }

    fn file_record(&mut self) {
        if self.record.is_some() {
            return;
        }
        let record = self.run.record();
        match self.scores.insert(record.clone()) {
            Some(rank) => tracing::info!(rank, gold = record.gold, "run ranked"),
            None => tracing::info!(gold = record.gold, "run did not rank"),
        }
        self.record = Some(record);
    }
}
