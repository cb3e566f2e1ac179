//! Events: the signed records carried by the protocol.
//!
//! An event is immutable once signed. Changes are new events with a new id
//! and a new signature.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{build_identity, event_identity};
use crate::crypto::{Keys, PublicKey, Signature};
use crate::error::CoreError;
use crate::types::EventId;

/// Discriminator of the publish envelope.
pub const EVENT_ENVELOPE: &str = "EVENT";

/// A tag: an ordered list of strings, the first naming the tag.
///
/// Common examples: `["h", <group id>]` scopes an event to a group,
/// `["p", <pubkey>]` names a user, `["e", <event id>]` references an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub Vec<String>);

impl Tag {
    /// Build a tag from its parts.
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The tag name (first element).
    pub fn kind(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The first value after the name.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Tag {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Event fields before identity and signature are attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedEvent {
    pub pubkey: PublicKey,
    /// Unix seconds.
    pub created_at: u64,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Compute the identity these fields would have once signed.
    pub fn compute_id(&self) -> Result<EventId, CoreError> {
        event_identity(self)
    }

    /// Finalize: compute the identity and sign it.
    ///
    /// `keys` must be the key pair of `pubkey`.
    pub fn sign(self, keys: &Keys) -> Result<SignedEvent, CoreError> {
        if keys.public_key() != self.pubkey {
            return Err(CoreError::KeyMismatch);
        }
        let id = self.compute_id()?;
        let sig = keys.sign(id.as_bytes())?;
        Ok(SignedEvent {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        })
    }
}

/// A signed event in its NIP-01 object form.
///
/// ```json
/// {
///   "id": "<64 hex>",
///   "pubkey": "<64 hex>",
///   "created_at": 1700000000,
///   "kind": 9,
///   "tags": [["h", "group"]],
///   "content": "hello",
///   "sig": "<128 hex>"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEvent {
    id: EventId,
    pubkey: PublicKey,
    created_at: u64,
    kind: u32,
    tags: Vec<Tag>,
    content: String,
    sig: Signature,
}

impl SignedEvent {
    /// Parse an event object received from elsewhere. Nothing is verified.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the event object.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wrap as the publish envelope `["EVENT", <event>]`.
    pub fn to_envelope(&self) -> Result<Value, CoreError> {
        Ok(Value::Array(vec![
            Value::String(EVENT_ENVELOPE.to_string()),
            serde_json::to_value(self)?,
        ]))
    }

    /// Recompute the identity from the stated fields.
    pub fn recompute_id(&self) -> Result<EventId, CoreError> {
        build_identity(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )
    }

    /// Copy the signed-over fields back out.
    pub fn to_unsigned(&self) -> UnsignedEvent {
        UnsignedEvent {
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags.clone(),
            content: self.content.clone(),
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn pubkey(&self) -> &PublicKey {
        &self.pubkey
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn kind(&self) -> u32 {
        self.kind
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sig(&self) -> &Signature {
        &self.sig
    }

    /// All tags with the given name, in order.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| t.kind() == Some(name))
    }
}

/// Builder for creating events.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    kind: u32,
    created_at: u64,
    tags: Vec<Tag>,
    content: String,
}

impl EventBuilder {
    /// Start building an event of the given kind.
    pub fn new(kind: u32) -> Self {
        Self {
            kind,
            created_at: 0,
            tags: Vec::new(),
            content: String::new(),
        }
    }

    /// Set the creation time (Unix seconds).
    pub fn created_at(mut self, ts: u64) -> Self {
        self.created_at = ts;
        self
    }

    /// Append a tag.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Append several tags, keeping their order.
    pub fn tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Set the content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Attach an author without signing.
    pub fn to_unsigned(self, pubkey: PublicKey) -> UnsignedEvent {
        UnsignedEvent {
            pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
        }
    }

    /// Build and sign the event.
    pub fn sign(self, keys: &Keys) -> Result<SignedEvent, CoreError> {
        self.to_unsigned(keys.public_key()).sign(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SeededRandom;

    fn keys() -> Keys {
        Keys::generate(&SeededRandom::new(42)).unwrap()
    }

    #[test]
    fn test_event_builder() {
        let keys = keys();
        let event = EventBuilder::new(9)
            .created_at(1700000000)
            .tag(Tag::new(["h", "g1"]))
            .content("hello")
            .sign(&keys)
            .unwrap();

        assert_eq!(event.kind(), 9);
        assert_eq!(event.created_at(), 1700000000);
        assert_eq!(event.content(), "hello");
        assert_eq!(event.pubkey(), &keys.public_key());
        assert_eq!(event.tags(), &[Tag::new(["h", "g1"])]);
        assert_eq!(event.recompute_id().unwrap(), *event.id());
    }

    #[test]
    fn test_sign_with_foreign_keys_fails() {
        let unsigned = EventBuilder::new(1).to_unsigned(PublicKey::from_bytes([1; 32]));
        assert!(matches!(unsigned.sign(&keys()), Err(CoreError::KeyMismatch)));
    }

    #[test]
    fn test_event_json_shape() {
        let event = EventBuilder::new(9)
            .created_at(5)
            .tag(Tag::new(["h", "g1"]))
            .content("c")
            .sign(&keys())
            .unwrap();
        let value: Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert_eq!(obj["id"].as_str().unwrap().len(), 64);
        assert_eq!(obj["pubkey"].as_str().unwrap().len(), 64);
        assert_eq!(obj["sig"].as_str().unwrap().len(), 128);
        assert_eq!(obj["created_at"], 5);
        assert_eq!(obj["kind"], 9);
        assert_eq!(obj["tags"], serde_json::json!([["h", "g1"]]));
        assert_eq!(obj["content"], "c");
    }

    #[test]
    fn test_event_json_roundtrip() {
        let event = EventBuilder::new(7)
            .created_at(99)
            .tag(Tag::new(["e", "abc"]))
            .content("+")
            .sign(&keys())
            .unwrap();
        let parsed = SignedEvent::from_json(&event.to_json().unwrap()).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_envelope() {
        let event = EventBuilder::new(9).sign(&keys()).unwrap();
        let envelope = event.to_envelope().unwrap();
        let arr = envelope.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0], "EVENT");
        assert_eq!(arr[1]["id"], event.id().to_hex());
    }

    #[test]
    fn test_from_json_rejects_bad_hex() {
        let json = serde_json::json!({
            "id": "zz",
            "pubkey": "00",
            "created_at": 1,
            "kind": 1,
            "tags": [],
            "content": "",
            "sig": "00",
        });
        assert!(SignedEvent::from_json(&json.to_string()).is_err());
    }

    #[test]
    fn test_tag_accessors() {
        let tag: Tag = ["e", "id1", "", "root"].into_iter().collect();
        assert_eq!(tag.kind(), Some("e"));
        assert_eq!(tag.value(), Some("id1"));
        assert_eq!(tag.len(), 4);
        assert!(Tag::new(Vec::<String>::new()).kind().is_none());
    }
}
