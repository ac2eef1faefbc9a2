use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};

use crate::{
    config::GameConfig,
    ecs::{EcsWorld, snapshot::WorldSnapshot},
    error::EngineError,
    log::MessageLog,
    map::{
        GameMap,
        generation::{FloorGenerator, RoomsAndCorridors},
    },
};

use super::{Run, RunStats};

/// Everything needed to pick a run up again between turns. The byte format
/// is left to the caller; [`RunSnapshot::to_json`] is one option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub config: GameConfig,
    pub map: GameMap,
    pub stats: RunStats,
    pub log: MessageLog,
    pub world: WorldSnapshot,
}

impl RunSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Run {
    pub fn snapshot(&self) -> Result<RunSnapshot, EngineError> {
        Ok(RunSnapshot {
            config: self.config.clone(),
            map: self.map.clone(),
            stats: self.stats.clone(),
            log: self.log.clone(),
            world: self.ecs.snapshot()?,
        })
    }

    /// Resumes a saved run with the standard generator for later floors.
    pub fn resume(snapshot: &RunSnapshot) -> Result<Self, EngineError> {
        let seed = snapshot.config.seed ^ u64::from(snapshot.stats.current_floor);
        Self::restore(snapshot, Box::new(RoomsAndCorridors::seeded(seed)))
    }

    /// Resumes a saved run, generating later floors with `generator`. The
    /// random stream is reseeded from the seed and the turn count, so it
    /// does not replay the opening turns.
    pub fn restore(
        snapshot: &RunSnapshot,
        generator: Box<dyn FloorGenerator>,
    ) -> Result<Self, EngineError> {
        let ecs = EcsWorld::restore(&snapshot.world)?;
        let turns = u64::from(snapshot.stats.turn_count);
        let run = Self {
            ecs,
            map: snapshot.map.clone(),
            stats: snapshot.stats.clone(),
            log: snapshot.log.clone(),
            rng: RandomNumberGenerator::seeded(snapshot.config.seed ^ 0x9e37_79b9 ^ turns),
            config: snapshot.config.clone(),
            mouse: Point::new(0, 0),
            boss_slayer: None,
            generator,
        };
        tracing::info!(
            floor = run.stats.current_floor,
            turn = run.stats.turn_count,
            "run restored"
        );
        Ok(run)
    }
}
