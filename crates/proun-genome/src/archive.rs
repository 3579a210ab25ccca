//! Genome archive: lossless JSON export/import of genome sets
//!
//! The only operation the storage layer depends on. Import failures are
//! recoverable: callers fall back to random generation instead of
//! crashing on a missing or malformed archive.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyMatrix;
use crate::gene::{MuscleGene, NodeGene};
use crate::genome::Genome;

/// Errors surfaced by the archive layer. All variants are recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("failed to read genome archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed genome archive: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("genome {id}: muscle {origin}->{connected} is invalid for {node_count} nodes")]
    InvalidMuscle {
        id: String,
        origin: usize,
        connected: usize,
        node_count: usize,
    },
}

/// Flat, serializable form of one genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeData {
    pub id: String,
    pub nodes: Vec<NodeGene>,
    pub muscles: Vec<MuscleGene>,
}

impl Genome {
    /// Flatten into the serializable form.
    pub fn to_data(&self) -> GenomeData {
        GenomeData {
            id: self.id().to_string(),
            nodes: self.nodes().to_vec(),
            muscles: self.muscles().values().cloned().collect(),
        }
    }

    /// Rebuild a genome from its serialized form.
    ///
    /// Node genes are re-indexed to their positions; muscles referencing
    /// indices outside the node sequence, or with an inverted pair, are
    /// rejected.
    pub fn from_data(data: GenomeData) -> Result<Genome, ArchiveError> {
        let mut nodes = data.nodes;
        for (i, node) in nodes.iter_mut().enumerate() {
            node.index = i;
        }

        let mut muscles = AdjacencyMatrix::new(nodes.len());
        for muscle in data.muscles {
            if muscle.origin_node >= muscle.connected_node || muscle.connected_node >= nodes.len()
            {
                return Err(ArchiveError::InvalidMuscle {
                    id: data.id,
                    origin: muscle.origin_node,
                    connected: muscle.connected_node,
                    node_count: nodes.len(),
                });
            }
            muscles.set(muscle.origin_node, muscle.connected_node, muscle);
        }

        Ok(Genome::from_parts(data.id, nodes, muscles))
    }
}

/// Serialize a genome set to a JSON blob.
pub fn export_genomes(genomes: &[Genome]) -> String {
    let data: Vec<GenomeData> = genomes.iter().map(Genome::to_data).collect();
    serde_json::to_string_pretty(&data).expect("genome data serializes infallibly")
}

/// Rebuild a genome set from a JSON blob.
pub fn import_genomes(blob: &str) -> Result<Vec<Genome>, ArchiveError> {
    let data: Vec<GenomeData> = serde_json::from_str(blob)?;
    data.into_iter().map(Genome::from_data).collect()
}

/// Append a genome set to an archive file, creating it if absent.
pub fn save_genomes(path: impl AsRef<Path>, genomes: &[Genome]) -> Result<(), ArchiveError> {
    let blob = export_genomes(genomes);
    let path = path.as_ref();
    let fresh = !path.exists();
    let mut file = fs::OpenOptions::new().append(true).create(true).open(path)?;
    if !fresh {
        file.write_all(b"\n")?;
    }
    file.write_all(blob.as_bytes())?;
    log::info!("Saved {} genomes to {}", genomes.len(), path.display());
    Ok(())
}

/// Load the most recently saved genome set from an archive file.
pub fn load_genomes(path: impl AsRef<Path>) -> Result<Vec<Genome>, ArchiveError> {
    let contents = fs::read_to_string(path.as_ref())?;
    // Saves append whole JSON documents; keep the newest one.
    let latest = match contents.rfind("\n[") {
        Some(pos) => &contents[pos + 1..],
        None => contents.as_str(),
    };
    import_genomes(latest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn sample_genomes(count: usize, seed: u64) -> Vec<Genome> {
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        (0..count).map(|_| Genome::random(3, 9, &mut rng)).collect()
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let genomes = sample_genomes(5, 31);
        let blob = export_genomes(&genomes);
        let restored = import_genomes(&blob).expect("round trip");

        assert_eq!(restored.len(), genomes.len());
        for (original, restored) in genomes.iter().zip(&restored) {
            assert_eq!(restored.id(), original.id());
            assert_eq!(restored.node_count(), original.node_count());
            assert_eq!(restored.nodes(), original.nodes());
            assert!(restored.verify());
            let originals: Vec<_> = original.muscles().values().collect();
            let restoreds: Vec<_> = restored.muscles().values().collect();
            assert_eq!(restoreds, originals);
        }
    }

    #[test]
    fn test_malformed_blob_is_recoverable() {
        let result = import_genomes("not json at all");
        assert!(matches!(result, Err(ArchiveError::Malformed(_))));
    }

    #[test]
    fn test_out_of_range_muscle_rejected() {
        let genomes = sample_genomes(1, 32);
        let mut data = genomes[0].to_data();
        if let Some(muscle) = data.muscles.first_mut() {
            muscle.connected_node = 99;
        } else {
            return; // seed produced no muscles; nothing to corrupt
        }
        let result = Genome::from_data(data);
        assert!(matches!(result, Err(ArchiveError::InvalidMuscle { .. })));
    }

    #[test]
    fn test_import_reindexes_nodes() {
        let genomes = sample_genomes(1, 33);
        let mut data = genomes[0].to_data();
        for node in &mut data.nodes {
            node.index = 77;
        }
        let restored = Genome::from_data(data).expect("import");
        assert!(restored.verify());
    }

    #[test]
    fn test_missing_file_is_recoverable() {
        let result = load_genomes("/definitely/not/a/real/archive.json");
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_save_appends_and_load_returns_latest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("prouns.json");

        let first = sample_genomes(2, 34);
        let second = sample_genomes(3, 35);
        save_genomes(&path, &first).expect("first save");
        save_genomes(&path, &second).expect("second save");

        let loaded = load_genomes(&path).expect("load");
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].id(), second[0].id());
    }
}
