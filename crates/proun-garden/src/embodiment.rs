//! Boundary traits toward the physics/engine layer
//!
//! The garden never touches rigid bodies or scene objects. It hands a
//! genome to a [`Habitat`], receives an opaque body back, and polls it
//! for lifetime and terminal physical state.

use glam::Vec3;

use proun_genome::Genome;

/// Terminal physical state of an expired individual, as reported by the
/// embodiment layer.
#[derive(Debug, Clone, Default)]
pub struct TerminalState {
    /// Center-of-mass position history, oldest first.
    pub track: Vec<Vec3>,
    /// Abnormal physical events ("flukes") detected over the lifetime.
    pub anomaly_count: u32,
}

/// A live, embodied creature.
pub trait Embodiment {
    /// Simulation ticks this body has been alive.
    fn lifetime_ticks(&self) -> u32;

    /// Snapshot of the body's terminal physical state.
    fn terminal_state(&self) -> TerminalState;
}

/// The external world that turns genomes into live creatures.
pub trait Habitat {
    type Body: Embodiment;

    /// Instantiate a genome as a live creature.
    fn spawn(&mut self, genome: &Genome) -> Self::Body;

    /// Tear down an expired creature.
    fn destroy(&mut self, body: Self::Body);
}
