//! Graph-encoded creature genomes for Proun
//!
//! This crate implements:
//! - A triangular adjacency store for sparse pairwise muscle connections
//! - Node and muscle genes with randomized construction and per-field
//!   mutation
//! - The genome: random generation, asymmetric crossover between parents
//!   of different sizes, and lossless JSON archival
//!
//! Randomness is always injected (`&mut impl Rng`), so callers can seed a
//! generator for reproducible runs.

pub mod adjacency;
pub mod archive;
pub mod gene;
pub mod genome;
pub mod util;

// Re-export main types for convenience
pub use adjacency::AdjacencyMatrix;
pub use archive::{
    ArchiveError, GenomeData, export_genomes, import_genomes, load_genomes, save_genomes,
};
pub use gene::{
    EnableMode, JointKind, MuscleGene, MuscleMutationConfig, MutationConfig, NodeGene,
    NodeMutationConfig, NudgeSettings,
};
pub use genome::Genome;
