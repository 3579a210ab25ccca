//! Shared helpers for randomized gene construction and mutation

use glam::Vec3;
use rand::Rng;

/// Inclusive-exclusive legal range for a numeric gene field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Uniform draw within a field's legal range.
pub fn gen_in(rng: &mut impl Rng, range: Range) -> f32 {
    range.min + rng.gen::<f32>() * range.size()
}

/// Weighted coin flip.
pub fn chance(rng: &mut impl Rng, probability: f32) -> bool {
    rng.gen::<f32>() < probability
}

/// Redraw a value uniformly in a sub-interval of size `amount * range.size()`
/// centered on the old value, clamped back into the legal range.
pub fn nudge(rng: &mut impl Rng, value: f32, range: Range, amount: f32) -> f32 {
    let window = range.size() * amount;
    range.clamp(value + rng.gen::<f32>() * window - window / 2.0)
}

/// One of the six axis-aligned unit vectors.
pub fn random_axis(rng: &mut impl Rng) -> Vec3 {
    const AXES: [Vec3; 6] = [
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    AXES[rng.gen_range(0..AXES.len())]
}
