use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::types::{Die, DieResult, Pool, Results};

/// Source of die faces. Returns a value in `1..=max`.
pub trait Roller {
    fn roll_in_range(&mut self, max: u32) -> u32;
}

pub struct ThreadRngRoller {
    rng: rand::rngs::ThreadRng,
}

impl ThreadRngRoller {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ThreadRngRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl Roller for ThreadRngRoller {
    fn roll_in_range(&mut self, max: u32) -> u32 {
        self.rng.random_range(1..=max)
    }
}

/// Reproducible roller; two instances with the same seed yield the same faces.
#[derive(Debug, Clone)]
pub struct SeededRoller {
    rng: StdRng,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Roller for SeededRoller {
    fn roll_in_range(&mut self, max: u32) -> u32 {
        self.rng.random_range(1..=max)
    }
}

/// Time-derived seed used once at process start when none is configured.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Process-wide roller shared by every request.
///
/// A whole pool is rolled under one lock, so concurrent rolls never
/// interleave their draws.
#[derive(Debug, Clone)]
pub struct SharedRoller {
    inner: Arc<Mutex<SeededRoller>>,
}

impl SharedRoller {
    pub fn new(roller: SeededRoller) -> Self {
        Self { inner: Arc::new(Mutex::new(roller)) }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededRoller::new(seed))
    }

    pub fn roll(&self, pool: Pool) -> Results {
        let mut roller = self.inner.lock();
        roll(pool, &mut *roller)
    }
}

/// Roll every die in the pool: skilled, unskilled, lucky, then unlucky.
pub fn roll(pool: Pool, roller: &mut impl Roller) -> Results {
    let Pool { skilled, unskilled, lucky, unlucky } = pool;

    let skill = skilled.into_iter().chain(unskilled).map(|die| roll_die(die, roller)).collect();
    let luck = lucky.into_iter().chain(unlucky).map(|die| roll_die(die, roller)).collect();

    Results { skill, luck }
}

fn roll_die(die: Die, roller: &mut impl Roller) -> DieResult {
    let value = roller.roll_in_range(die.sides);
    DieResult { value, is_success: die.is_success(value), die }
}
