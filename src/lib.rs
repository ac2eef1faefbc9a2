//! Turn-resolution core of a grid dungeon crawler: actions, combat, the turn
//! engine and the input-mode state machine, plus the bracket-lib front-end
//! helpers that draw them.

pub mod actions;
pub mod ai;
pub mod combat;
pub mod config;
pub mod data;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod log;
pub mod map;
pub mod modes;
pub mod render;
pub mod score;
pub mod scripted_input;
