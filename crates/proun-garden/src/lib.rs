//! Evolutionary population control for Proun creatures
//!
//! A [`Garden`] owns a fixed-size population of genomes, embodies them
//! through a caller-supplied [`Habitat`], scores expired individuals with
//! a [`FitnessStrategy`], and breeds each next generation with elitism
//! plus tournament selection. The garden is tick-driven and holds no
//! physics of its own.

pub mod config;
pub mod embodiment;
pub mod fitness;
pub mod garden;

// Re-export main types for convenience
pub use config::GardenConfig;
pub use embodiment::{Embodiment, Habitat, TerminalState};
pub use fitness::{FitnessStrategy, TravelFitness};
pub use garden::{Garden, Status, select_top, shotgun_select};
