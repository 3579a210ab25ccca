//! End-to-end evolution loop against a stub habitat.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use glam::Vec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use proun_garden::{
    Embodiment, FitnessStrategy, Garden, GardenConfig, Habitat, Status, TerminalState,
};
use proun_genome::{Genome, save_genomes};

/// Body that ages by one tick per lifetime poll and travels one unit per
/// genome node, so larger genomes score higher. It also reports one
/// anomaly per node so the anomaly bookkeeping is observable.
struct StubBody {
    node_count: usize,
    age: Cell<u32>,
}

impl Embodiment for StubBody {
    fn lifetime_ticks(&self) -> u32 {
        let next = self.age.get() + 1;
        self.age.set(next);
        next
    }

    fn terminal_state(&self) -> TerminalState {
        TerminalState {
            track: vec![Vec3::ZERO, Vec3::new(self.node_count as f32, 0.0, 0.0)],
            anomaly_count: self.node_count as u32,
        }
    }
}

#[derive(Default)]
struct StubHabitat {
    spawned: Rc<Cell<usize>>,
    destroyed: Rc<Cell<usize>>,
}

impl Habitat for StubHabitat {
    type Body = StubBody;

    fn spawn(&mut self, genome: &Genome) -> StubBody {
        self.spawned.set(self.spawned.get() + 1);
        StubBody {
            node_count: genome.node_count(),
            age: Cell::new(0),
        }
    }

    fn destroy(&mut self, _body: StubBody) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

struct NodeCountFitness;

impl FitnessStrategy for NodeCountFitness {
    fn evaluate(&self, state: &TerminalState) -> f32 {
        let (Some(first), Some(last)) = (state.track.first(), state.track.last()) else {
            return 0.0;
        };
        (*last - *first).length()
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn small_config() -> GardenConfig {
    GardenConfig {
        population_size: 6,
        elitism: 2,
        blast_size: 3,
        maximum_lifetime: 2,
        maximum_generations: 3,
        min_proun_size: 2,
        max_proun_size: 6,
        ..GardenConfig::default()
    }
}

#[test]
fn test_garden_runs_to_generation_limit() {
    init_logging();
    let habitat = StubHabitat::default();
    let spawned = Rc::clone(&habitat.spawned);
    let destroyed = Rc::clone(&habitat.destroyed);

    let mut garden = Garden::with_seed(small_config(), habitat, NodeCountFitness, 7);

    let mut ticks = 0;
    loop {
        ticks += 1;
        assert!(ticks < 10_000, "garden failed to terminate");
        if garden.tick() == Status::Finished {
            break;
        }
    }

    // Three generations of six bodies, each fully spawned and torn down.
    assert_eq!(garden.generation(), 2);
    assert_eq!(spawned.get(), 18);
    assert_eq!(destroyed.get(), 18);
}

#[test]
fn test_population_size_is_invariant_across_generations() {
    init_logging();
    let mut garden =
        Garden::with_seed(small_config(), StubHabitat::default(), NodeCountFitness, 11);

    while garden.generation() < 2 {
        garden.tick();
    }

    let genomes = garden.current_genomes();
    assert_eq!(genomes.len(), 6);
    for genome in genomes {
        let genome = genome.as_ref().expect("fresh generation is fully populated");
        assert!(genome.verify());
        assert!(genome.node_count() >= 2);
    }
}

#[test]
fn test_elites_survive_unchanged() {
    let mut garden =
        Garden::with_seed(small_config(), StubHabitat::default(), NodeCountFitness, 23);

    // Fitness equals node count, so the expected elites are the two
    // largest genomes of generation zero (earliest index wins ties).
    let mut ranked: Vec<(usize, String)> = garden
        .current_genomes()
        .iter()
        .map(|g| {
            let g = g.as_ref().expect("generation zero is fully populated");
            (g.node_count(), g.id().to_string())
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    let expected: Vec<&str> = ranked[..2].iter().map(|(_, id)| id.as_str()).collect();

    while garden.generation() < 1 {
        garden.tick();
    }

    let survivors: Vec<&str> = garden.current_genomes()[..2]
        .iter()
        .map(|g| g.as_ref().expect("elite slot is populated").id())
        .collect();
    assert_eq!(survivors, expected);
}

#[test]
fn test_last_fitness_reflects_expired_generation() {
    let mut garden =
        Garden::with_seed(small_config(), StubHabitat::default(), NodeCountFitness, 31);

    let node_counts: Vec<usize> = garden
        .current_genomes()
        .iter()
        .map(|g| g.as_ref().expect("populated").node_count())
        .collect();

    while garden.generation() < 1 {
        garden.tick();
    }

    for (i, &count) in node_counts.iter().enumerate() {
        assert!((garden.last_fitness()[i] - count as f32).abs() < 1e-6);
        assert_eq!(garden.last_anomalies()[i], count as u32);
    }
}

#[test]
fn test_seed_archive_populates_generation_zero() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("seed.json");

    let mut rng = Xoshiro256StarStar::seed_from_u64(51);
    let saved: Vec<Genome> = (0..4).map(|_| Genome::random(2, 6, &mut rng)).collect();
    save_genomes(&path, &saved).expect("save seed archive");

    let config = GardenConfig {
        seed_archive: Some(path),
        ..small_config()
    };
    let garden = Garden::with_seed(config, StubHabitat::default(), NodeCountFitness, 7);

    // Archived genomes fill the first slots in order; the remainder of
    // the population is generated randomly.
    let genomes = garden.current_genomes();
    assert_eq!(genomes.len(), 6);
    for (slot, genome) in genomes.iter().enumerate() {
        let genome = genome.as_ref().expect("generation zero is fully populated");
        if slot < saved.len() {
            assert_eq!(genome.id(), saved[slot].id());
        }
        assert!(genome.verify());
    }
}

#[test]
fn test_missing_seed_archive_falls_back_to_random() {
    init_logging();
    let config = GardenConfig {
        seed_archive: Some(PathBuf::from("/definitely/not/a/real/seed.json")),
        ..small_config()
    };
    let garden = Garden::with_seed(config, StubHabitat::default(), NodeCountFitness, 13);

    for genome in garden.current_genomes() {
        let genome = genome.as_ref().expect("fallback population is full");
        assert!(genome.verify());
    }
}
