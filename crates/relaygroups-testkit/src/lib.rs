//! # relaygroups testkit
//!
//! Testing utilities for relaygroups.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: BIP-340 reference values and canonical event
//!   serializations with their expected ids
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic keys, a frozen clock and a wired catalog
//!
//! ## Golden Vectors
//!
//! ```rust
//! use relaygroups_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, id) in verify_all_vectors() {
//!     println!("{name}: {id} ({})", if matches { "ok" } else { "MISMATCH" });
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use relaygroups_testkit::generators::{event_from_params, EventParams};
//!
//! proptest! {
//!     #[test]
//!     fn event_id_is_deterministic(params: EventParams) {
//!         let e1 = event_from_params(&params);
//!         let e2 = event_from_params(&params);
//!         prop_assert_eq!(e1.id(), e2.id());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use relaygroups_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed(7);
//! let msg = fixture.catalog.send_message(&fixture.keys, "g1", "hello").unwrap();
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, TestFixture, FIXTURE_TIME_SECS};
pub use generators::{event_from_params, EventParams};
pub use vectors::{
    canonical_vectors, check_schnorr_vector, schnorr_vectors, verify_all_vectors, CanonicalVector,
    SchnorrVector,
};
