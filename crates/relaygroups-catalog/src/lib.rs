//! # relaygroups catalog
//!
//! The typed catalog of relay-group messages: which kind each group action
//! uses, which tags it carries, and how publish and subscribe envelopes are
//! laid out on the wire.
//!
//! ## Overview
//!
//! Actions live in a static table ([`ACTIONS`]) consumed by one generic
//! builder ([`MessageCatalog::publish`]). Queries build a [`Filter`] and
//! wrap it with a subscription id.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use relaygroups_catalog::{CatalogConfig, MessageCatalog, QueryWindow};
//! use relaygroups_core::{Keys, OsRandom, SystemClock};
//!
//! fn example() -> relaygroups_catalog::Result<()> {
//!     let keys = Keys::generate(&OsRandom)?;
//!     let catalog = MessageCatalog::new(OsRandom, SystemClock, CatalogConfig::default());
//!
//!     let publish = catalog.send_message(&keys, "rust", "hello")?;
//!     let subscribe = catalog.group_messages("rust", QueryWindow::limit(10), None)?;
//!
//!     println!("{}", publish.to_json()?);
//!     println!("{}", subscribe.to_json()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! ["EVENT", {"id": ..., "pubkey": ..., "kind": 9, "tags": [["h", "rust"]], ...}]
//! ["REQ", "sub-1700000000000", {"kinds": [9], "#h": ["rust"], "limit": 10}]
//! ```

pub mod actions;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod invite;
pub mod kinds;
pub mod messages;

pub use actions::{
    build_tags, Action, ActionSpec, ContentRule, GroupMetadata, GroupRequest, GroupScope, ACTIONS,
};
pub use catalog::{CatalogConfig, MessageCatalog, QueryWindow};
pub use error::{CatalogError, Result};
pub use filter::Filter;
pub use invite::{generate_invite_code, is_valid_invite_code, INVITE_ALPHABET, INVITE_CODE_LEN};
pub use kinds::Kind;
pub use messages::{ClientMessage, SubscriptionIdGenerator, REQ_ENVELOPE};
