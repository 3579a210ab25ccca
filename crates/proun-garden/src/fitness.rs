//! Pluggable fitness scoring
//!
//! The exact scoring formula is a strategy object rather than a baked-in
//! expression; runs can weigh travel distance, anomalies, or anything
//! else derivable from the terminal state.

use crate::embodiment::TerminalState;

/// Converts a terminal physical state into a scalar fitness.
pub trait FitnessStrategy {
    fn evaluate(&self, state: &TerminalState) -> f32;
}

/// Default strategy: planar (horizontal) displacement between the first
/// and last track samples, with a per-anomaly penalty, floored at zero.
#[derive(Debug, Clone)]
pub struct TravelFitness {
    pub anomaly_penalty: f32,
}

impl Default for TravelFitness {
    fn default() -> Self {
        Self {
            anomaly_penalty: 1.0,
        }
    }
}

impl FitnessStrategy for TravelFitness {
    fn evaluate(&self, state: &TerminalState) -> f32 {
        let (Some(first), Some(last)) = (state.track.first(), state.track.last()) else {
            return 0.0;
        };
        let mut delta = *last - *first;
        delta.y = 0.0;
        (delta.length() - self.anomaly_penalty * state.anomaly_count as f32).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_empty_track_scores_zero() {
        let fitness = TravelFitness::default();
        assert_eq!(fitness.evaluate(&TerminalState::default()), 0.0);
    }

    #[test]
    fn test_vertical_travel_does_not_count() {
        let fitness = TravelFitness::default();
        let state = TerminalState {
            track: vec![Vec3::ZERO, Vec3::new(0.0, 50.0, 0.0)],
            anomaly_count: 0,
        };
        assert_eq!(fitness.evaluate(&state), 0.0);
    }

    #[test]
    fn test_planar_travel_minus_penalty() {
        let fitness = TravelFitness {
            anomaly_penalty: 2.0,
        };
        let state = TerminalState {
            track: vec![Vec3::ZERO, Vec3::new(3.0, 9.0, 4.0)],
            anomaly_count: 1,
        };
        assert!((fitness.evaluate(&state) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_fitness_is_floored_at_zero() {
        let fitness = TravelFitness {
            anomaly_penalty: 10.0,
        };
        let state = TerminalState {
            track: vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)],
            anomaly_count: 5,
        };
        assert_eq!(fitness.evaluate(&state), 0.0);
    }
}
