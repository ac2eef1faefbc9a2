//! Turn engine: owns the run context and resolves one player turn at a time.

mod snapshot;
pub mod stats;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use chrono::Utc;
use specs::Entity;

use crate::{
    actions::Action,
    ai, combat,
    config::GameConfig,
    data::{items::ItemTemplate, monsters::PlayerTemplate},
    ecs::{
        EcsWorld,
        components::{Equipment, Fighter, Inventory, Level},
    },
    error::{ActionError, EngineError},
    log::{MessageLog, palette},
    map::{
        GameMap,
        generation::{FloorGenerator, FloorParams, RoomsAndCorridors},
    },
};

pub use self::snapshot::RunSnapshot;
pub use self::stats::{FinalStats, RunRecord, RunStats};

/// What the mode machine should do after [`advance_turn`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The action was refused; nothing changed and no time passed.
    NotConsumed,
    Continue,
    PlayerDied,
    LevelUp,
    Cleared,
}

/// Everything one run mutates: entities, the current floor, counters and
/// the message log. Passed explicitly to every action.
pub struct Run {
    pub ecs: EcsWorld,
    pub map: GameMap,
    pub stats: RunStats,
    pub log: MessageLog,
    pub config: GameConfig,
    pub rng: RandomNumberGenerator,
    /// Cell under the mouse cursor, in map coordinates.
    pub mouse: Point,
    /// Whoever landed the killing blow on the boss during the current
    /// action, until the clear is settled.
    pub(crate) boss_slayer: Option<Entity>,
    generator: Box<dyn FloorGenerator>,
}

impl Run {
    pub fn new_game(config: GameConfig) -> Result<Self, EngineError> {
        let generator = RoomsAndCorridors::seeded(config.seed);
        Self::with_generator(config, Box::new(generator))
    }

    /// Starts a run on floor 1 using `generator` for every floor.
    pub fn with_generator(
        config: GameConfig,
        mut generator: Box<dyn FloorGenerator>,
    ) -> Result<Self, EngineError> {
        let mut ecs = EcsWorld::new(&PlayerTemplate::default(), config.player_inventory_capacity);
        let stats = RunStats::new(Utc::now());
        let params = FloorParams::for_floor(stats.current_floor, &config);
        let floor = generator.generate(&params, &mut ecs)?;
        let player = ecs.player();
        ecs.set_position(player, floor.player_start)?;

        let mut run = Self {
            ecs,
            map: floor.map,
            stats,
            log: MessageLog::default(),
            rng: RandomNumberGenerator::seeded(config.seed ^ 0x9e37_79b9),
            config,
            mouse: Point::new(0, 0),
            boss_slayer: None,
            generator,
        };
        run.equip_starting_gear()?;
        run.update_fov();
        run.log.add(
            "Hello and welcome, adventurer, to yet another dungeon!",
            palette::welcome(),
        );
        tracing::info!(seed = run.config.seed, "new run started");
        Ok(run)
    }

    fn equip_starting_gear(&mut self) -> Result<(), EngineError> {
        let player = self.ecs.player();
        let dagger = self.ecs.spawn_item(&ItemTemplate::dagger(), None);
        let armor = self.ecs.spawn_item(&ItemTemplate::leather_armor(), None);
        self.ecs.update::<Inventory, _>(player, |inv| {
            inv.items.push(dagger);
            inv.items.push(armor);
        })?;
        self.ecs.update::<Equipment, _>(player, |eq| {
            eq.weapon = Some(dagger);
            eq.armor = Some(armor);
        })
    }

    pub fn player(&self) -> Entity {
        self.ecs.player()
    }

    /// Recomputes what the player sees from where they stand.
    pub fn update_fov(&mut self) {
        if let Some(origin) = self.ecs.position(self.player()) {
            self.map.update_fov(origin, self.config.fov_radius);
        }
    }

    /// Replaces the current floor with a freshly generated, deeper one. If
    /// generation fails the old floor is put back untouched.
    pub fn descend(&mut self) -> Result<(), EngineError> {
        let old_floor = self.ecs.lift_floor();
        let next = self.stats.current_floor + 1;
        let params = FloorParams::for_floor(next, &self.config);
        let floor = match self.generator.generate(&params, &mut self.ecs) {
            Ok(floor) => floor,
            Err(err) => {
                tracing::warn!(floor = next, %err, "floor generation failed; staying put");
                self.ecs.restore_floor(old_floor)?;
                return Err(err);
            }
        };
        self.ecs.discard_floor(old_floor)?;
        let player = self.player();
        self.ecs.set_position(player, floor.player_start)?;
        self.map = floor.map;
        self.stats.current_floor = next;
        self.update_fov();
        self.log.add("You descend the staircase.", palette::descend());
        tracing::info!(floor = next, "descended");
        Ok(())
    }

    /// Applies a level-up choice and consumes the threshold experience.
    pub fn apply_level_up(&mut self, choice: LevelUpChoice) -> Result<(), EngineError> {
        let player = self.player();
        let (hp, power, defense) = (
            self.config.level_up_hp,
            self.config.level_up_power,
            self.config.level_up_defense,
        );
        let message = self.ecs.update::<Fighter, _>(player, |f| {
            match choice {
                LevelUpChoice::Constitution => {
                    f.max_hp += hp;
                    f.hp += hp;
                    "Your health improves!"
                }
                LevelUpChoice::Strength => {
                    f.base_power += power;
                    "You feel stronger!"
                }
                LevelUpChoice::Agility => {
                    f.base_defense += defense;
                    "Your movements are getting swifter!"
                }
            }
        })?;
        self.ecs.update::<Level, _>(player, Level::increase_level)?;
        self.log.push(message);
        Ok(())
    }

    pub fn player_is_dead(&self) -> bool {
        !self.ecs.is_alive(self.player())
    }

    pub fn level_up_pending(&self) -> bool {
        self.ecs
            .level(self.player())
            .is_some_and(|level| level.requires_level_up())
    }

    /// Snapshot for the ranking board.
    pub fn record(&self) -> RunRecord {
        let player = self.player();
        let fighter = self.ecs.fighter(player);
        let now = Utc::now();
        RunRecord {
            version: stats::VERSION.to_string(),
            date: now,
            gold: self.ecs.gold(player),
            bonus_from_items: self.stats.item_bonus_gold,
            floor: self.stats.current_floor,
            level: self.ecs.level(player).map_or(1, |l| l.current_level),
            turns: self.stats.turn_count,
            time_sec: (now - self.stats.start).num_seconds(),
            total_exp: self.stats.total_exp,
            damage_dealt: self.stats.total_damage_dealt,
            damage_taken: self.stats.total_damage_taken,
            attacked_count: self.stats.times_attacked,
            stats: FinalStats {
                max_hp: fighter.map_or(0, |f| f.max_hp),
                power: self.ecs.power(player),
                defense: self.ecs.defense(player),
            },
            cleared: self.stats.cleared,
        }
    }

    fn post_turn_outcome(&self) -> TurnOutcome {
        if self.player_is_dead() {
            TurnOutcome::PlayerDied
        } else if self.level_up_pending() {
            TurnOutcome::LevelUp
        } else if self.stats.cleared {
            TurnOutcome::Cleared
        } else {
            TurnOutcome::Continue
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LevelUpChoice {
    Constitution,
    Strength,
    Agility,
}

/// Resolves one full turn: the player's action, then every AI actor, then
/// visibility. A refused player action consumes nothing. Once the boss has
/// fallen to a living player the monsters get no further turn.
pub fn advance_turn(run: &mut Run, action: &Action) -> Result<TurnOutcome, EngineError> {
    match action.perform(run) {
        Ok(()) => {}
        Err(ActionError::Impossible(reason)) => {
            run.log.add(reason, palette::impossible());
            return Ok(TurnOutcome::NotConsumed);
        }
        Err(ActionError::Engine(err)) => return Err(err),
    }

    run.stats.turn_count += 1;
    combat::settle_boss_death(run)?;
    if !run.stats.cleared {
        handle_enemy_turns(run)?;
        combat::settle_boss_death(run)?;
    }
    run.update_fov();

    let outcome = run.post_turn_outcome();
    tracing::debug!(turn = run.stats.turn_count, ?outcome, "turn resolved");
    Ok(outcome)
}

fn handle_enemy_turns(run: &mut Run) -> Result<(), EngineError> {
    for actor in run.ecs.ai_actors() {
        if !run.ecs.is_alive(actor) {
            continue;
        }
        match ai::take_turn(run, actor) {
            Ok(()) => {}
            Err(ActionError::Impossible(reason)) => {
                tracing::debug!(?actor, %reason, "ai action refused");
            }
            Err(ActionError::Engine(err)) => return Err(err),
        }
    }
    Ok(())
}
