//! Positional tempo gradient across the corpus.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TempoCurve {
    pub base_bpm: f64,
    /// BPM difference between the first and last unit
    pub spread: f64,
    /// Number of major units the gradient spans
    pub total_units: u32,
}

impl Default for TempoCurve {
    fn default() -> Self {
        Self {
            base_bpm: 84.0,
            spread: 18.0,
            total_units: 114,
        }
    }
}

impl TempoCurve {
    pub fn with_base(base_bpm: f64) -> Self {
        Self {
            base_bpm,
            ..Self::default()
        }
    }

    /// Tempo for a major index: `base + (0.5 - u) * spread` where `u` is the
    /// index's normalized position. Index 0 plays at the base tempo.
    pub fn bpm_for(&self, major: u32) -> f64 {
        if major == 0 || self.total_units <= 1 {
            return self.base_bpm;
        }
        let u = (major - 1) as f64 / (self.total_units - 1) as f64;
        self.base_bpm + (0.5 - u) * self.spread
    }

    /// Slowest tempo any major index reaches on this curve.
    pub fn min_bpm(&self) -> f64 {
        if self.total_units <= 1 {
            return self.base_bpm;
        }
        self.base_bpm - self.spread.abs() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let c = TempoCurve::default();
        assert!((c.bpm_for(1) - 93.0).abs() < 1e-9);
        assert!((c.bpm_for(114) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_min_bpm_is_last_unit() {
        let c = TempoCurve::default();
        assert!((c.min_bpm() - c.bpm_for(114)).abs() < 1e-9);
        assert!(TempoCurve::with_base(8.0).min_bpm() < 0.0);

        let reversed = TempoCurve { spread: -18.0, ..TempoCurve::default() };
        assert!((reversed.min_bpm() - reversed.bpm_for(1)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_index_is_base() {
        let c = TempoCurve::with_base(100.0);
        assert_eq!(c.bpm_for(0), 100.0);
    }

    #[test]
    fn test_monotonic_decreasing() {
        let c = TempoCurve::default();
        let bpms: Vec<f64> = (1..=114).map(|i| c.bpm_for(i)).collect();
        assert!(bpms.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_negative_spread_reverses() {
        let c = TempoCurve {
            spread: -18.0,
            ..TempoCurve::default()
        };
        assert!(c.bpm_for(1) < c.bpm_for(114));
    }

    #[test]
    fn test_degenerate_total() {
        let c = TempoCurve {
            total_units: 1,
            ..TempoCurve::default()
        };
        assert_eq!(c.bpm_for(5), 84.0);
    }
}
