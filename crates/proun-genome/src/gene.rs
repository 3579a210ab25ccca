//! Gene model: node genes (body segments) and muscle genes (connectors)
//!
//! Two closed gene kinds with randomized construction and a per-field
//! mutation operator driven by probability/amount settings. Field ranges
//! are fixed named constants; the integer ids (`body_type`, `material`)
//! index an asset registry owned by the embodiment layer, never by the
//! genome itself.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::util::{self, Range};

/// Legal mass range for a node gene.
pub const NODE_MASS: Range = Range::new(0.3, 0.9);
/// Legal range for both friction coefficients.
pub const NODE_FRICTION: Range = Range::new(0.2, 0.8);
/// Legal per-axis scale range for a node gene.
pub const NODE_SCALE: Range = Range::new(0.1, 5.0);
/// Number of body prefab ids the embodiment registry exposes.
pub const BODY_TYPE_COUNT: u32 = 4;
/// Number of material ids the embodiment registry exposes.
pub const MATERIAL_COUNT: u32 = 3;

/// Legal heart beat period range for a muscle gene, in seconds.
pub const MUSCLE_HEART_BEAT: Range = Range::new(0.8, 2.0);
/// Legal contraction time range, as a fraction of the heart beat.
pub const MUSCLE_CONTRACT_TIME: Range = Range::new(0.25, 0.75);
/// Legal extension distance range for a muscle gene.
pub const MUSCLE_EXTENSION: Range = Range::new(0.5, 1.5);

/// Kind of joint a muscle gene builds between its two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointKind {
    Spring,
    Fixed,
    Hinge,
}

impl JointKind {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => Self::Spring,
            1 => Self::Fixed,
            _ => Self::Hinge,
        }
    }
}

/// Whether a muscle actuates, hangs limp, or is carried silently.
///
/// `Disabled` marks genes inherited from the less-fit parent during
/// breeding: topology is preserved for future mutation without affecting
/// the current embodiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnableMode {
    Enabled,
    Limp,
    Disabled,
}

impl EnableMode {
    pub fn random(rng: &mut impl Rng) -> Self {
        match rng.gen_range(0..3) {
            0 => Self::Enabled,
            1 => Self::Limp,
            _ => Self::Disabled,
        }
    }
}

/// One rigid body segment of a creature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGene {
    pub index: usize,
    pub body_type: u32,
    pub mass: f32,
    pub dynamic_friction: f32,
    pub static_friction: f32,
    pub material: u32,
    pub scale: Vec3,
}

impl NodeGene {
    /// Draw a fresh node gene for position `index`.
    pub fn random(index: usize, rng: &mut impl Rng) -> Self {
        Self {
            index,
            body_type: rng.gen_range(0..BODY_TYPE_COUNT),
            mass: util::gen_in(rng, NODE_MASS),
            dynamic_friction: util::gen_in(rng, NODE_FRICTION),
            static_friction: util::gen_in(rng, NODE_FRICTION),
            material: rng.gen_range(0..MATERIAL_COUNT),
            scale: Vec3::new(
                util::gen_in(rng, NODE_SCALE),
                util::gen_in(rng, NODE_SCALE),
                util::gen_in(rng, NODE_SCALE),
            ),
        }
    }

    /// Node genes currently define no field-level mutation; new body
    /// parameters only enter the pool through freshly generated genomes.
    /// Intentional, not a gap.
    pub fn mutate(self, _config: &NodeMutationConfig, _rng: &mut impl Rng) -> Self {
        self
    }
}

/// One actuated or fixed connector between two node indices.
///
/// Invariant: `origin_node < connected_node`, enforced at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleGene {
    pub origin_node: usize,
    pub connected_node: usize,
    pub joint_kind: JointKind,
    pub heart_beat: f32,
    pub contract_time: f32,
    pub rest_length: f32,
    pub extension_distance: f32,
    pub axis: Vec3,
    pub enable_mode: EnableMode,
}

impl MuscleGene {
    /// Draw a fresh muscle gene connecting `origin_node` to
    /// `connected_node`.
    ///
    /// Panics when `origin_node >= connected_node`; a violating pair is a
    /// programming defect, not a runtime condition.
    pub fn random(origin_node: usize, connected_node: usize, rng: &mut impl Rng) -> Self {
        assert!(
            origin_node < connected_node,
            "cannot connect a muscle from {origin_node} to {connected_node}"
        );
        Self {
            origin_node,
            connected_node,
            joint_kind: JointKind::random(rng),
            heart_beat: util::gen_in(rng, MUSCLE_HEART_BEAT),
            contract_time: util::gen_in(rng, MUSCLE_CONTRACT_TIME),
            rest_length: 0.0,
            extension_distance: util::gen_in(rng, MUSCLE_EXTENSION),
            axis: util::random_axis(rng),
            enable_mode: EnableMode::Enabled,
        }
    }

    /// Apply the per-field mutation operator.
    ///
    /// The outer coin decides whether anything happens at all; when it
    /// fails the gene comes back untouched (a no-op, not a new identity).
    /// Numeric fields are nudged within `amount * range_size` of the old
    /// value and clamped; categorical fields are redrawn.
    pub fn mutate(mut self, config: &MuscleMutationConfig, rng: &mut impl Rng) -> Self {
        if !util::chance(rng, config.probability) {
            return self;
        }

        if util::chance(rng, config.joint_kind_probability) {
            self.joint_kind = JointKind::random(rng);
        }
        if util::chance(rng, config.heart_beat.probability) {
            self.heart_beat =
                util::nudge(rng, self.heart_beat, MUSCLE_HEART_BEAT, config.heart_beat.amount);
        }
        if util::chance(rng, config.contract_time.probability) {
            self.contract_time = util::nudge(
                rng,
                self.contract_time,
                MUSCLE_CONTRACT_TIME,
                config.contract_time.amount,
            );
        }
        if util::chance(rng, config.extension_distance.probability) {
            self.extension_distance = util::nudge(
                rng,
                self.extension_distance,
                MUSCLE_EXTENSION,
                config.extension_distance.amount,
            );
        }
        if util::chance(rng, config.axis_probability) {
            self.axis = util::random_axis(rng);
        }
        if util::chance(rng, config.enable_mode_probability) {
            self.enable_mode = EnableMode::random(rng);
        }

        self
    }
}

/// Probability/amount pair for one nudgeable numeric field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NudgeSettings {
    /// Chance the field mutates at all.
    pub probability: f32,
    /// Width of the redraw window as a fraction of the field's range.
    pub amount: f32,
}

/// Mutation settings for muscle genes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuscleMutationConfig {
    /// Chance the gene mutates at all.
    pub probability: f32,
    pub joint_kind_probability: f32,
    pub heart_beat: NudgeSettings,
    pub contract_time: NudgeSettings,
    pub extension_distance: NudgeSettings,
    pub axis_probability: f32,
    pub enable_mode_probability: f32,
}

impl Default for MuscleMutationConfig {
    fn default() -> Self {
        Self {
            probability: 0.25,
            joint_kind_probability: 0.1,
            heart_beat: NudgeSettings {
                probability: 0.3,
                amount: 0.2,
            },
            contract_time: NudgeSettings {
                probability: 0.3,
                amount: 0.2,
            },
            extension_distance: NudgeSettings {
                probability: 0.3,
                amount: 0.2,
            },
            axis_probability: 0.1,
            enable_mode_probability: 0.05,
        }
    }
}

/// Mutation settings for node genes. Carries the outer probability for
/// symmetry with muscles even though node mutation is currently a no-op.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeMutationConfig {
    pub probability: f32,
}

/// Per-gene-kind mutation settings bundle handed to the breeding operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationConfig {
    pub muscle: MuscleMutationConfig,
    pub node: NodeMutationConfig,
}
