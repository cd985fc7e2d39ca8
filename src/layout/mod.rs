mod config;
mod embedding;
mod force_atlas;
pub mod forces;
mod simulation;

pub use config::*;
pub use embedding::*;
pub use force_atlas::*;
pub use simulation::*;

#[cfg(test)]
mod simulation_tests;
