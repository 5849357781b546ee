use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Blocks the caller between attempts.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Throttles consecutive attempts against the same target with a random
/// pause drawn uniformly from `[min, max]`.
pub struct PacingPolicy {
    min: Duration,
    max: Duration,
    rng: StdRng,
    sleeper: Box<dyn Sleeper>,
}

impl PacingPolicy {
    pub fn new(min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            rng: StdRng::from_entropy(),
            sleeper: Box::new(ThreadSleeper),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn bounds(&self) -> (Duration, Duration) {
        (self.min, self.max)
    }

    pub fn next_delay(&mut self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(self.rng.gen_range(min..=max))
    }

    /// Draw a delay and sleep for it. Returns the delay used.
    pub fn pause(&mut self) -> Duration {
        let delay = self.next_delay();
        self.sleeper.sleep(delay);
        delay
    }
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(3))
    }
}
