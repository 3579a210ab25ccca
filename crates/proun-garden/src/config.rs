//! Configuration surface for the evolutionary loop

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use proun_genome::MutationConfig;

/// Parameters for a garden run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GardenConfig {
    /// Number of individuals per generation.
    pub population_size: usize,
    /// Number of top genomes carried forward unchanged each generation.
    pub elitism: usize,
    /// Candidates drawn per tournament ("shotgun") selection.
    pub blast_size: usize,
    /// Ticks an individual lives before its fitness is measured.
    pub maximum_lifetime: u32,
    /// Generations to run before finishing (0 = unlimited).
    pub maximum_generations: u32,
    /// Node count bounds for freshly generated genomes.
    pub min_proun_size: usize,
    pub max_proun_size: usize,
    /// Per-gene mutation settings applied during breeding.
    pub mutation: MutationConfig,
    /// Optional archive to seed generation zero from. Falls back to
    /// random generation when missing or malformed.
    pub seed_archive: Option<PathBuf>,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            population_size: 20,
            elitism: 2,
            blast_size: 3,
            maximum_lifetime: 1_000,
            maximum_generations: 0,
            min_proun_size: 3,
            max_proun_size: 8,
            mutation: MutationConfig::default(),
            seed_archive: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_coherent() {
        let config = GardenConfig::default();
        assert!(config.elitism < config.population_size);
        assert!(config.blast_size >= 1);
        assert!(config.min_proun_size >= 1);
        assert!(config.min_proun_size <= config.max_proun_size);
    }
}
