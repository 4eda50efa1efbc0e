//! Seeds for `init`/`step` calls
//!
//! Every call gets a fresh, independent random seed. A run can only be
//! reproduced by capturing the issued sequence and replaying it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

pub struct SeedSource {
    rng: StdRng,
    replay: VecDeque<i32>,
    captured: Option<Vec<i32>>,
}

impl SeedSource {
    /// Random seeds from OS entropy.
    pub fn from_entropy() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Deterministic generator, mostly for tests.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            replay: VecDeque::new(),
            captured: None,
        }
    }

    /// Issue `seeds` first, then fall back to random seeds.
    pub fn with_replay(mut self, seeds: impl IntoIterator<Item = i32>) -> Self {
        self.replay.extend(seeds);
        self
    }

    /// Record every issued seed.
    pub fn capturing(mut self) -> Self {
        self.captured = Some(Vec::new());
        self
    }

    pub fn next_seed(&mut self) -> i32 {
        let seed = match self.replay.pop_front() {
            Some(seed) => seed,
            None => self.rng.gen(),
        };
        if let Some(captured) = &mut self.captured {
            captured.push(seed);
        }
        seed
    }

    /// Seeds issued so far, when capturing.
    pub fn captured(&self) -> Option<&[i32]> {
        self.captured.as_deref()
    }

    /// Seeds left to replay.
    pub fn replay_remaining(&self) -> usize {
        self.replay.len()
    }
}
