//! Canonical JSON serialization of events for identity hashing.
//!
//! The hashed bytes are the compact JSON array
//! `[0,<pubkey hex>,<created_at>,<kind>,<tags>,<content>]` with no
//! whitespace. String escaping is serde_json's: `"` `\` and the control
//! characters `\b \f \n \r \t` get short escapes, other control characters
//! become `\u00xx`, and everything else (including non-ASCII) is written as
//! raw UTF-8.
//!
//! **CRITICAL**: This encoding is FROZEN. Every other implementation of the
//! protocol hashes the same bytes; a single differing byte changes the id
//! and invalidates the signature.

use tracing::trace;

use crate::crypto::{PublicKey, Sha256Hash};
use crate::error::CoreError;
use crate::event::{Tag, UnsignedEvent};
use crate::types::EventId;

/// First element of the canonical array.
pub const EVENT_DISCRIMINATOR: u8 = 0;

/// Encode event fields to the canonical bytes that are hashed.
pub fn canonical_event_bytes(
    pubkey: &PublicKey,
    created_at: u64,
    kind: u32,
    tags: &[Tag],
    content: &str,
) -> Result<Vec<u8>, CoreError> {
    let array = (
        EVENT_DISCRIMINATOR,
        pubkey.to_hex(),
        created_at,
        kind,
        tags,
        content,
    );
    Ok(serde_json::to_vec(&array)?)
}

/// Compute the event identity: SHA-256 over the canonical bytes.
pub fn build_identity(
    pubkey: &PublicKey,
    created_at: u64,
    kind: u32,
    tags: &[Tag],
    content: &str,
) -> Result<EventId, CoreError> {
    let bytes = canonical_event_bytes(pubkey, created_at, kind, tags, content)?;
    let id = EventId(Sha256Hash::hash(&bytes).0);
    trace!(kind, created_at, len = bytes.len(), id = %id, "computed event identity");
    Ok(id)
}

/// Compute the identity of an unsigned event.
pub fn event_identity(event: &UnsignedEvent) -> Result<EventId, CoreError> {
    build_identity(
        &event.pubkey,
        event.created_at,
        event.kind,
        &event.tags,
        &event.content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pubkey() -> PublicKey {
        PublicKey::from_bytes([0xab; 32])
    }

    #[test]
    fn test_canonical_layout() {
        let tags = vec![Tag::new(["h", "g1"]), Tag::new(["e", "e1", "", "root"])];
        let bytes = canonical_event_bytes(&pubkey(), 1700000000, 9, &tags, "hi").unwrap();
        let expected = format!(
            r#"[0,"{}",1700000000,9,[["h","g1"],["e","e1","","root"]],"hi"]"#,
            "ab".repeat(32)
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_canonical_empty_tags_and_content() {
        let bytes = canonical_event_bytes(&pubkey(), 0, 0, &[], "").unwrap();
        let expected = format!(r#"[0,"{}",0,0,[],""]"#, "ab".repeat(32));
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_canonical_escaping() {
        let content = "line\n\"quoted\"\t\\ \u{1} \u{8}\u{c}\r / é 😀";
        let bytes = canonical_event_bytes(&pubkey(), 1, 1, &[], content).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.ends_with(r#""line\n\"quoted\"\t\\ \u0001 \b\f\r / é 😀"]"#));
    }

    #[test]
    fn test_identity_deterministic() {
        let tags = vec![Tag::new(["h", "g1"])];
        let a = build_identity(&pubkey(), 10, 9, &tags, "x").unwrap();
        let b = build_identity(&pubkey(), 10, 9, &tags, "x").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_changes_with_each_field() {
        let tags = vec![Tag::new(["h", "g1"])];
        let base = build_identity(&pubkey(), 10, 9, &tags, "x").unwrap();

        let other_pk = PublicKey::from_bytes([0xac; 32]);
        assert_ne!(base, build_identity(&other_pk, 10, 9, &tags, "x").unwrap());
        assert_ne!(base, build_identity(&pubkey(), 11, 9, &tags, "x").unwrap());
        assert_ne!(base, build_identity(&pubkey(), 10, 7, &tags, "x").unwrap());
        assert_ne!(base, build_identity(&pubkey(), 10, 9, &[], "x").unwrap());
        assert_ne!(base, build_identity(&pubkey(), 10, 9, &tags, "y").unwrap());
    }

    #[test]
    fn test_tag_order_is_significant() {
        let a = vec![Tag::new(["h", "g1"]), Tag::new(["p", "x"])];
        let b = vec![Tag::new(["p", "x"]), Tag::new(["h", "g1"])];
        assert_ne!(
            build_identity(&pubkey(), 1, 9, &a, "").unwrap(),
            build_identity(&pubkey(), 1, 9, &b, "").unwrap()
        );
    }

    #[test]
    fn test_identity_is_sha256_of_canonical_bytes() {
        let bytes = canonical_event_bytes(&pubkey(), 5, 1, &[], "abc").unwrap();
        let id = build_identity(&pubkey(), 5, 1, &[], "abc").unwrap();
        assert_eq!(id.0, Sha256Hash::hash(&bytes).0);
    }
}
