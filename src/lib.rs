//! Library entry point.
//!
//! The simulation is a set of Bevy plugins driven from a fixed-step schedule.
//! Hosts either embed [`game::Simulation`] and call `tick` themselves, or run the
//! headless app from `game::run`.
//!
//! Integration tests in `tests/` are compiled as separate crates.
//! A `lib.rs` gives them a stable public API surface to import.

pub mod game;
pub mod common;
pub mod plugins;
