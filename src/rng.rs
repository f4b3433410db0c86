//! Deterministic random number generation
//!
//! A session draws every random value from one seeded ChaCha stream, so a
//! fixed seed replays the same weather year after year.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    seed: u64,
    master: ChaCha8Rng,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            master: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Borrow the session stream. Successive borrows continue where the
    /// previous one stopped.
    pub fn stream(&mut self) -> SystemRng<'_> {
        SystemRng {
            inner: &mut self.master,
        }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Helper functions for common random operations
pub trait RngExt {
    /// Standard normal variate (Box-Muller).
    fn standard_normal(&mut self) -> f64;
    fn normal(&mut self, mean: f64, deviation: f64) -> f64;
}

impl<R: Rng + ?Sized> RngExt for R {
    fn standard_normal(&mut self) -> f64 {
        // gen() is in [0, 1); flip it so ln never sees zero
        let u1 = 1.0 - self.gen::<f64>();
        let u2 = self.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    fn normal(&mut self, mean: f64, deviation: f64) -> f64 {
        mean + self.standard_normal() * deviation
    }
}
