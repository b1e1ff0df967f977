//! Move recognition seam.
//!
//! The motion detector only knows that something happened and on which
//! side. Attaching a concrete move to an event is the job of a
//! [`MoveRecognizer`]. No real recognizer exists yet, so the default
//! attaches nothing and the report stays honest. The synthetic recognizer
//! produces demo data and marks the whole report as synthetic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xko_models::{CharacterProfile, DataQuality, Event, MoveObservation, MoveOutcome};

pub trait MoveRecognizer {
    /// Claim what move produced `event`, if known.
    fn recognize(&mut self, event: &Event, profile: &CharacterProfile) -> Option<MoveObservation>;

    fn data_quality(&self) -> DataQuality;
}

/// Recognizes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMoveRecognizer;

impl MoveRecognizer for NoMoveRecognizer {
    fn recognize(&mut self, _event: &Event, _profile: &CharacterProfile) -> Option<MoveObservation> {
        None
    }

    fn data_quality(&self) -> DataQuality {
        DataQuality::Measured
    }
}

/// Seeded random observations for demonstrations.
#[derive(Debug, Clone)]
pub struct SyntheticMoveRecognizer {
    rng: StdRng,
    hit_rate: f64,
}

const OUTCOMES: [MoveOutcome; 3] = [MoveOutcome::Hit, MoveOutcome::Blocked, MoveOutcome::Whiffed];

impl SyntheticMoveRecognizer {
    pub fn new(seed: u64, hit_rate: f64) -> Self {
        let hit_rate = if hit_rate.is_finite() {
            hit_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            rng: StdRng::seed_from_u64(seed),
            hit_rate,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        self.hit_rate
    }
}

impl MoveRecognizer for SyntheticMoveRecognizer {
    fn recognize(&mut self, _event: &Event, profile: &CharacterProfile) -> Option<MoveObservation> {
        if profile.moves.is_empty() || !self.rng.random_bool(self.hit_rate) {
            return None;
        }
        let index = self.rng.random_range(0..profile.moves.len());
        let notation = profile.moves.keys().nth(index)?;
        let outcome = OUTCOMES[self.rng.random_range(0..OUTCOMES.len())];
        let observation = MoveObservation::new(notation.clone(), outcome);
        if self.rng.random_bool(0.5) {
            Some(observation.with_assist())
        } else {
            Some(observation)
        }
    }

    fn data_quality(&self) -> DataQuality {
        DataQuality::Synthetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{require, StaticCatalog};
    use xko_models::{Actor, EventKind};

    fn events(n: u64) -> Vec<Event> {
        (0..n)
            .map(|i| Event::new(i as f64, i * 60, Actor::Player1, EventKind::HitOrBlock, "x"))
            .collect()
    }

    #[test]
    fn test_no_recognizer_is_measured_and_empty() {
        let catalog = StaticCatalog::builtin();
        let profile = require(&catalog, "Blitzcrank").unwrap();
        let mut recognizer = NoMoveRecognizer;
        assert!(events(20).iter().all(|e| recognizer.recognize(e, profile).is_none()));
        assert_eq!(recognizer.data_quality(), DataQuality::Measured);
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        let catalog = StaticCatalog::builtin();
        let profile = require(&catalog, "Blitzcrank").unwrap();
        let run = |seed: u64| {
            let mut r = SyntheticMoveRecognizer::new(seed, 0.5);
            events(50)
                .iter()
                .map(|e| r.recognize(e, profile))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_synthetic_rate_bounds() {
        let catalog = StaticCatalog::builtin();
        let profile = require(&catalog, "Blitzcrank").unwrap();

        let mut always = SyntheticMoveRecognizer::new(1, 1.0);
        for e in events(10) {
            let obs = always.recognize(&e, profile).unwrap();
            assert!(profile.moves.contains_key(&obs.notation));
        }
        assert_eq!(always.data_quality(), DataQuality::Synthetic);

        let mut never = SyntheticMoveRecognizer::new(1, 0.0);
        assert!(events(10).iter().all(|e| never.recognize(e, profile).is_none()));
        assert_eq!(SyntheticMoveRecognizer::new(1, 3.0).hit_rate(), 1.0);
    }
}
