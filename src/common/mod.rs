//! Common, shared types.

pub mod error;
pub mod events;
pub mod layers;
pub mod rng;
pub mod state;
pub mod tunables;
pub mod units;

#[cfg(test)]
pub mod test_utils;
