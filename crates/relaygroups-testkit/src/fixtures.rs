//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic keys, a frozen
//! clock and a catalog wired to both.

use relaygroups_catalog::{CatalogConfig, MessageCatalog};
use relaygroups_core::{FixedClock, Keys, PublicKey, SeededRandom};

/// The instant fixtures are frozen at: 2023-11-14T22:13:20Z.
pub const FIXTURE_TIME_SECS: u64 = 1_700_000_000;

/// A test fixture with deterministic keys and a frozen clock.
pub struct TestFixture {
    pub keys: Keys,
    pub catalog: MessageCatalog<SeededRandom, FixedClock>,
}

impl TestFixture {
    /// Create a fixture from a seed. The same seed gives the same keys
    /// and the same invite codes.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(seed, CatalogConfig::default())
    }

    pub fn with_config(seed: u64, config: CatalogConfig) -> Self {
        let keys = Keys::generate(&SeededRandom::new(seed)).expect("seeded source never fails");
        let catalog = MessageCatalog::new(
            SeededRandom::new(seed.wrapping_add(1)),
            FixedClock::from_secs(FIXTURE_TIME_SECS),
            config,
        );
        Self { keys, catalog }
    }

    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }

    pub fn pubkey_hex(&self) -> String {
        self.keys.public_key().to_hex()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| TestFixture::with_seed(1000 + 2 * i as u64))
        .collect()
}
