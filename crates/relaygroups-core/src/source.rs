//! Randomness and time, the two process-wide inputs of the core.
//!
//! Both are traits so callers can substitute a fixed clock or a seeded
//! generator in tests without changing behavior.

use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::CoreError;

/// A source of uniformly random bytes.
///
/// Implementations must be safe for concurrent use (Send + Sync); the core
/// never serializes access on their behalf.
pub trait RandomSource: Send + Sync {
    /// Fill `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError>;
}

impl<T: RandomSource + ?Sized> RandomSource for &T {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
        (**self).fill_bytes(dest)
    }
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CoreError::RandomSource(e.to_string()))
    }
}

/// A deterministic generator for tests and reproducible fixtures.
///
/// Never use this for real keys.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), CoreError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| CoreError::RandomSource("seeded generator poisoned".into()))?;
        rng.fill_bytes(dest);
        Ok(())
    }
}

/// Wall-clock time in seconds and milliseconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;

    fn now_secs(&self) -> u64 {
        self.now_millis() / 1000
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }

    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}

/// The system clock. A clock set before 1970 reads as the epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    millis: u64,
}

impl FixedClock {
    pub const fn from_millis(millis: u64) -> Self {
        Self { millis }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            millis: secs * 1000,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a = SeededRandom::new(7);
        let b = SeededRandom::new(7);
        let mut x = [0u8; 48];
        let mut y = [0u8; 48];
        a.fill_bytes(&mut x).unwrap();
        b.fill_bytes(&mut y).unwrap();
        assert_eq!(x, y);

        let c = SeededRandom::new(8);
        let mut z = [0u8; 48];
        c.fill_bytes(&mut z).unwrap();
        assert_ne!(x, z);
    }

    #[test]
    fn test_os_random_fills() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        OsRandom.fill_bytes(&mut a).unwrap();
        OsRandom.fill_bytes(&mut b).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::from_millis(1_700_000_000_123);
        assert_eq!(clock.now_secs(), 1_700_000_000);
        assert_eq!(clock.now_millis(), 1_700_000_000_123);
        assert_eq!(FixedClock::from_secs(5).now_millis(), 5000);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_secs() > 1_577_836_800);
    }
}
