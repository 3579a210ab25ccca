//! Population and generation control
//!
//! Owns the live population, records fitness as individuals expire, and
//! at each generation boundary runs elitism plus tournament selection to
//! breed the next generation. Single-threaded and tick-driven: one call
//! to [`Garden::tick`] per external simulation frame.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use proun_genome::{Genome, load_genomes};

use crate::config::GardenConfig;
use crate::embodiment::{Embodiment, Habitat};
use crate::fitness::FitnessStrategy;

/// Generation-transition latch. While `Advancing`, no individual may be
/// spawned or measured; the per-tick scan is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    Advancing,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// The configured maximum generation count was reached.
    Finished,
}

/// The evolutionary loop around a population of prouns.
pub struct Garden<H: Habitat, F, R> {
    config: GardenConfig,
    habitat: H,
    fitness: F,
    rng: R,
    phase: Phase,
    generation: u32,
    alive: usize,
    current_genomes: Vec<Option<Genome>>,
    current_bodies: Vec<Option<H::Body>>,
    last_genomes: Vec<Option<Genome>>,
    last_fitness: Vec<f32>,
    last_anomalies: Vec<u32>,
}

impl<H, F> Garden<H, F, Xoshiro256StarStar>
where
    H: Habitat,
    F: FitnessStrategy,
{
    /// Create a garden with a seeded generator for reproducible runs.
    pub fn with_seed(config: GardenConfig, habitat: H, fitness: F, seed: u64) -> Self {
        Self::new(config, habitat, fitness, Xoshiro256StarStar::seed_from_u64(seed))
    }
}

impl<H, F, R> Garden<H, F, R>
where
    H: Habitat,
    F: FitnessStrategy,
    R: Rng,
{
    /// Create a garden and populate generation zero, either from the
    /// configured seed archive or by random generation.
    pub fn new(config: GardenConfig, habitat: H, fitness: F, mut rng: R) -> Self {
        assert!(config.population_size >= 2, "population needs at least two slots");
        assert!(
            config.elitism < config.population_size,
            "elitism must leave room for bred offspring"
        );
        assert!(config.blast_size >= 1, "tournament needs at least one candidate");
        assert!(config.min_proun_size >= 1, "prouns need at least one node");

        let population = config.population_size;
        let mut current_genomes: Vec<Option<Genome>> = Vec::with_capacity(population);

        if let Some(path) = &config.seed_archive {
            match load_genomes(path) {
                Ok(saved) => {
                    log::info!(
                        "Seeding generation 0 with {} archived genomes from {}",
                        saved.len().min(population),
                        path.display()
                    );
                    current_genomes.extend(saved.into_iter().take(population).map(Some));
                }
                Err(e) => {
                    log::warn!("Failed to load seed archive, generating randomly: {e}");
                }
            }
        }
        while current_genomes.len() < population {
            current_genomes.push(Some(Genome::random(
                config.min_proun_size,
                config.max_proun_size,
                &mut rng,
            )));
        }

        let mut current_bodies = Vec::with_capacity(population);
        current_bodies.resize_with(population, || None);

        Self {
            habitat,
            fitness,
            rng,
            phase: Phase::Running,
            generation: 0,
            alive: population,
            current_genomes,
            current_bodies,
            last_genomes: (0..population).map(|_| None).collect(),
            last_fitness: vec![0.0; population],
            last_anomalies: vec![0; population],
            config,
        }
    }

    /// Current generation number, starting at 0.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Individuals still alive in the current generation.
    pub fn alive(&self) -> usize {
        self.alive
    }

    /// Fitness recorded for the previous generation, by slot.
    pub fn last_fitness(&self) -> &[f32] {
        &self.last_fitness
    }

    /// Anomaly counts recorded for the previous generation, by slot.
    pub fn last_anomalies(&self) -> &[u32] {
        &self.last_anomalies
    }

    /// Genomes of the current generation, by slot. Retired slots are
    /// `None` until the generation advances.
    pub fn current_genomes(&self) -> &[Option<Genome>] {
        &self.current_genomes
    }

    /// Advance the garden by one simulation frame: embody pending
    /// genomes, retire expired individuals, and advance the generation
    /// once every slot has reported.
    pub fn tick(&mut self) -> Status {
        if self.phase == Phase::Advancing {
            return Status::Running;
        }

        for i in 0..self.config.population_size {
            let Some(genome) = &self.current_genomes[i] else {
                continue;
            };

            if self.current_bodies[i].is_none() {
                self.current_bodies[i] = Some(self.habitat.spawn(genome));
            }

            let body = self.current_bodies[i]
                .as_ref()
                .expect("live slot has a body");
            if body.lifetime_ticks() < self.config.maximum_lifetime {
                continue;
            }

            let state = body.terminal_state();
            let fitness = self.fitness.evaluate(&state);
            log::debug!(
                "Proun {} expired with fitness {fitness:.3} ({} anomalies)",
                genome.id(),
                state.anomaly_count
            );

            self.last_fitness[i] = fitness;
            self.last_anomalies[i] = state.anomaly_count;
            self.last_genomes[i] = self.current_genomes[i].take();
            let body = self.current_bodies[i].take().expect("body present");
            self.habitat.destroy(body);

            assert!(self.alive > 0, "more deaths reported than living prouns");
            self.alive -= 1;
        }

        if self.alive == 0 {
            if self.config.maximum_generations > 0
                && self.generation + 1 >= self.config.maximum_generations
            {
                log::info!(
                    "Reached maximum generation count ({})",
                    self.config.maximum_generations
                );
                return Status::Finished;
            }
            self.new_generation();
        }

        Status::Running
    }

    /// Atomic generation transition: elitism, then mating.
    fn new_generation(&mut self) {
        self.phase = Phase::Advancing;
        self.generation += 1;
        self.alive = self.config.population_size;

        let best = self
            .last_fitness
            .iter()
            .cloned()
            .fold(f32::NEG_INFINITY, f32::max);
        log::info!(
            "Generating generation {} (best fitness {best:.3})",
            self.generation
        );

        let mut next: Vec<Option<Genome>> = Vec::with_capacity(self.config.population_size);

        // Elitism: the top genomes pass forward unchanged.
        for &winner in &select_top(&self.last_fitness, self.config.elitism) {
            let elite = self.last_genomes[winner]
                .as_ref()
                .expect("elite slot recorded a genome")
                .clone();
            next.push(Some(elite));
        }

        // Mating: tournament-select two distinct parents per open slot.
        while next.len() < self.config.population_size {
            let suitor = shotgun_select(&self.last_fitness, self.config.blast_size, &mut self.rng);
            let mut mate = suitor;
            while mate == suitor {
                mate = shotgun_select(&self.last_fitness, self.config.blast_size, &mut self.rng);
            }

            let (worse, better) = if self.last_fitness[suitor] <= self.last_fitness[mate] {
                (suitor, mate)
            } else {
                (mate, suitor)
            };

            let child = Genome::breed(
                self.last_genomes[worse]
                    .as_ref()
                    .expect("parent slot recorded a genome"),
                self.last_genomes[better]
                    .as_ref()
                    .expect("parent slot recorded a genome"),
                self.last_fitness[worse],
                self.last_fitness[better],
                &self.config.mutation,
                &mut self.rng,
            );
            next.push(Some(child));
        }

        self.current_genomes = next;
        // Every body was destroyed on expiry; reset the slots in place.
        for slot in &mut self.current_bodies {
            *slot = None;
        }

        self.phase = Phase::Running;
    }
}

/// Indices of the `count` highest fitness values, best first. Exact ties
/// resolve to the earliest index.
pub fn select_top(fitnesses: &[f32], count: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..fitnesses.len()).collect();
    indices.sort_by(|&a, &b| {
        fitnesses[b]
            .partial_cmp(&fitnesses[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    indices.truncate(count);
    indices
}

/// Tournament selection: draw `blast_size` random candidates and keep the
/// fittest (earlier draws win strict ties).
pub fn shotgun_select(fitnesses: &[f32], blast_size: usize, rng: &mut impl Rng) -> usize {
    let mut max_index = rng.gen_range(0..fitnesses.len());
    let mut max_fitness = fitnesses[max_index];

    for _ in 1..blast_size {
        let candidate = rng.gen_range(0..fitnesses.len());
        if fitnesses[candidate] > max_fitness {
            max_index = candidate;
            max_fitness = fitnesses[candidate];
        }
    }

    max_index
}
