//! # relaygroups
//!
//! Signed messages for relay-based groups: secp256k1 identities, BIP-340
//! Schnorr signatures over canonical event identities, and the catalog of
//! group actions and queries.
//!
//! ## Overview
//!
//! - **Events**: Immutable, signed records. Changes are new events.
//! - **Groups**: Identified by a string id carried in an `h` tag (or a `d`
//!   tag for group definitions and group state).
//! - **Envelopes**: `["EVENT", event]` to publish, `["REQ", id, filter]`
//!   to subscribe.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use relaygroups::{ClientConfig, GroupClient, GroupMetadata, QueryWindow};
//!
//! fn example() -> relaygroups::Result<()> {
//!     // A fresh identity, OS randomness and the system clock
//!     let client = GroupClient::generate(ClientConfig::default())?;
//!
//!     // Create a group and talk in it
//!     let create = client.create_group("rust", GroupMetadata::new().name("Rust").public(true))?;
//!     let hello = client.send_message("rust", "hello")?;
//!
//!     // Subscribe to the latest messages
//!     let req = client.group_messages("rust", QueryWindow::limit(50), None)?;
//!
//!     for msg in [create, hello, req] {
//!         println!("{}", msg.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `relaygroups::core` - Keys, signatures, events, verification
//! - `relaygroups::catalog` - Kinds, actions, filters, envelopes

pub mod client;
pub mod error;

// Re-export component crates
pub use relaygroups_catalog as catalog;
pub use relaygroups_core as core;

// Re-export main types for convenience
pub use client::{ClientConfig, GroupClient};
pub use error::{Error, Result};

pub use relaygroups_catalog::{
    Action, CatalogConfig, ClientMessage, Filter, GroupMetadata, GroupRequest, Kind, QueryWindow,
};
pub use relaygroups_core::{
    verify_event, EventId, Keys, PublicKey, SecretKey, Signature, SignedEvent, Tag,
};
