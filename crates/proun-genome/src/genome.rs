//! Genome: an ordered node sequence plus a triangular muscle store
//!
//! A genome is pure data. It knows nothing about rigid bodies or scene
//! objects; the embodiment layer reads it and builds a creature, then
//! reports back a scalar fitness that drives selection and breeding.

use rand::Rng;

use crate::adjacency::AdjacencyMatrix;
use crate::gene::{EnableMode, MuscleGene, MutationConfig, NodeGene};
use crate::util;

/// Maximum wiring attempts per node during random generation. Attempt `k`
/// proceeds with probability `(3 - k) / 3`, which bounds expected muscle
/// count roughly linearly in node count and leaves low indices denser.
const WIRING_ATTEMPTS: usize = 3;

/// Compact graph encoding of one creature.
#[derive(Debug, Clone)]
pub struct Genome {
    id: String,
    nodes: Vec<NodeGene>,
    muscles: AdjacencyMatrix<MuscleGene>,
}

impl Genome {
    /// Generate a fresh random genome with a node count uniform in
    /// `[min_size, max_size]`.
    ///
    /// Panics when `min_size` is zero or exceeds `max_size`; an empty
    /// genome cannot be embodied and is rejected up front.
    pub fn random(min_size: usize, max_size: usize, rng: &mut impl Rng) -> Self {
        assert!(min_size >= 1, "genome must have at least one node");
        assert!(min_size <= max_size, "invalid genome size bounds");

        let size = rng.gen_range(min_size..=max_size);
        let nodes: Vec<NodeGene> = (0..size).map(|i| NodeGene::random(i, rng)).collect();

        let mut muscles = AdjacencyMatrix::new(size);
        for i in 0..size {
            let mut candidates: Vec<usize> = (i + 1..size).collect();
            for attempt in 0..WIRING_ATTEMPTS {
                if candidates.is_empty() {
                    break;
                }
                let keep_going = (WIRING_ATTEMPTS - attempt) as f32 / WIRING_ATTEMPTS as f32;
                if !util::chance(rng, keep_going) {
                    break;
                }
                let pick = rng.gen_range(0..candidates.len());
                let j = candidates.swap_remove(pick);
                muscles.set(i, j, MuscleGene::random(i, j, rng));
            }
        }

        let genome = Self {
            id: Self::random_id(rng),
            nodes,
            muscles,
        };
        debug_assert!(genome.verify());
        genome
    }

    /// Assemble a genome from already-validated parts (used by the archive
    /// importer and by breeding).
    pub(crate) fn from_parts(
        id: String,
        nodes: Vec<NodeGene>,
        muscles: AdjacencyMatrix<MuscleGene>,
    ) -> Self {
        Self { id, nodes, muscles }
    }

    fn random_id(rng: &mut impl Rng) -> String {
        format!("proun-{:08x}", rng.gen::<u32>())
    }

    /// Opaque identity, stable across export/import.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> &[NodeGene] {
        &self.nodes
    }

    pub fn muscles(&self) -> &AdjacencyMatrix<MuscleGene> {
        &self.muscles
    }

    /// Check the structural invariants: `nodes[i].index == i` for every
    /// node, and `origin < connected < node_count` for every muscle.
    pub fn verify(&self) -> bool {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.index != i {
                return false;
            }
        }
        self.muscles.values().all(|muscle| {
            muscle.origin_node < muscle.connected_node
                && muscle.connected_node < self.nodes.len()
        })
    }

    /// Produce a child genome from two parents of possibly different
    /// sizes.
    ///
    /// Node genes in the overlap region are inherited from `better` with
    /// probability `fitness_better / (fitness_worse + fitness_better)`
    /// (0.5 when both fitnesses are zero) and from `worse` otherwise;
    /// nodes beyond the overlap come from the larger parent. Muscles from
    /// `worse` are carried over the overlap region with their enable mode
    /// forced to `Disabled`; muscles from `better` are run through the
    /// mutation operator and overwrite on collision, so the fitter
    /// parent's topology dominates.
    pub fn breed(
        worse: &Genome,
        better: &Genome,
        fitness_worse: f32,
        fitness_better: f32,
        config: &MutationConfig,
        rng: &mut impl Rng,
    ) -> Genome {
        assert!(worse.node_count() >= 1, "cannot breed an empty genome");
        assert!(better.node_count() >= 1, "cannot breed an empty genome");

        let smaller_size = worse.node_count().min(better.node_count());
        let larger_size = worse.node_count().max(better.node_count());
        let larger_parent = if worse.node_count() >= better.node_count() {
            worse
        } else {
            better
        };

        let fitness_sum = fitness_worse + fitness_better;
        let fitness_ratio = if fitness_sum == 0.0 {
            0.5
        } else {
            fitness_better / fitness_sum
        };

        let mut nodes = Vec::with_capacity(larger_size);
        for i in 0..larger_size {
            let source = if i >= smaller_size {
                larger_parent
            } else if util::chance(rng, fitness_ratio) {
                better
            } else {
                worse
            };
            let mut node = source.nodes[i].clone();
            node.index = i;
            nodes.push(node);
        }

        let mut muscles = AdjacencyMatrix::new(larger_size);

        // Less-fit parent first: overlap-region topology carried inert.
        for i in 0..smaller_size {
            for j in (i + 1)..smaller_size {
                if let Some(muscle) = worse.muscles.get(i, j) {
                    let mut muscle = muscle.clone();
                    muscle.enable_mode = EnableMode::Disabled;
                    muscles.set(i, j, muscle);
                }
            }
        }

        // Fitter parent second, mutated, overwriting on overlap.
        for i in 0..better.node_count() {
            for j in (i + 1)..better.node_count() {
                if let Some(muscle) = better.muscles.get(i, j) {
                    let muscle = muscle.clone().mutate(&config.muscle, rng);
                    muscles.set(i, j, muscle);
                }
            }
        }

        let child = Genome::from_parts(Self::random_id(rng), nodes, muscles);
        debug_assert!(child.verify());
        child
    }
}
