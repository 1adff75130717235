//! Global detection scalar

use serde::{Deserialize, Serialize};

use crate::core::types::Turn;

pub const DETECTION_MAX: i32 = 100;

/// Network-wide risk score, always within 0..=100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionMeter {
    level: i32,
}

impl DetectionMeter {
    pub fn new(level: i32) -> Self {
        Self {
            level: level.clamp(0, DETECTION_MAX),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Add (or with a negative amount, remove) detection; returns the applied delta
    pub fn add(&mut self, amount: i32) -> i32 {
        let before = self.level;
        self.level = (self.level.saturating_add(amount)).clamp(0, DETECTION_MAX);
        self.level - before
    }

    /// Remove detection; returns the amount actually removed
    pub fn reduce(&mut self, amount: i32) -> i32 {
        -self.add(-amount.max(0))
    }

    pub fn reached(&self, threshold: i32) -> bool {
        self.level >= threshold
    }
}

/// Is `turn` a passive-trickle turn for the given cadence?
pub fn passive_trickle_due(turn: Turn, cadence: u32) -> bool {
    cadence > 0 && turn % cadence as Turn == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_high_and_low() {
        let mut meter = DetectionMeter::new(95);
        assert_eq!(meter.add(20), 5);
        assert_eq!(meter.level(), 100);
        assert_eq!(meter.reduce(130), 100);
        assert_eq!(meter.level(), 0);
        assert_eq!(meter.reduce(5), 0);
    }

    #[test]
    fn test_constructor_clamps() {
        assert_eq!(DetectionMeter::new(-4).level(), 0);
        assert_eq!(DetectionMeter::new(400).level(), 100);
    }

    #[test]
    fn test_threshold() {
        let mut meter = DetectionMeter::new(89);
        assert!(!meter.reached(90));
        meter.add(1);
        assert!(meter.reached(90));
    }

    #[test]
    fn test_trickle_cadence() {
        assert!(passive_trickle_due(15, 15));
        assert!(passive_trickle_due(30, 15));
        assert!(!passive_trickle_due(16, 15));
        assert!(!passive_trickle_due(10, 0));
    }
}
