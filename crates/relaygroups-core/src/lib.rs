//! # relaygroups core
//!
//! Pure primitives for signing and verifying relay-group events: secp256k1
//! keys, BIP-340 Schnorr signatures, and the canonical event identity.
//!
//! This crate contains no I/O and no networking. Randomness and time enter
//! through the [`RandomSource`] and [`Clock`] traits.
//!
//! ## Key Types
//!
//! - [`Keys`] - A secret scalar and its x-only public key
//! - [`SignedEvent`] - An event with identity and signature attached
//! - [`EventId`] - SHA-256 of the canonical serialization
//! - [`Tag`] - Ordered list of strings attached to an event
//!
//! ## Canonicalization
//!
//! Event identities hash compact JSON. See the [`canonical`] module.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod event;
pub mod source;
pub mod types;
pub mod validation;

pub use canonical::{build_identity, canonical_event_bytes};
pub use crypto::{
    bytes_to_hex, derive_public_key, generate_private_key, hex_to_bytes, normalize_for_signing,
    sha256, sign, verify, Keys, PublicKey, SecretKey, Sha256Hash, Signature,
};
pub use error::{CoreError, ValidationError};
pub use event::{EventBuilder, SignedEvent, Tag, UnsignedEvent, EVENT_ENVELOPE};
pub use source::{Clock, FixedClock, OsRandom, RandomSource, SeededRandom, SystemClock};
pub use types::EventId;
pub use validation::{validate_event, verify_event};
