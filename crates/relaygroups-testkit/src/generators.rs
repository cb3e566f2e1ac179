//! Proptest generators for property-based testing.

use proptest::prelude::*;

use relaygroups_core::{EventBuilder, EventId, Keys, SecretKey, SignedEvent, Tag};

/// Generate a valid secret key. Out-of-range scalars are filtered out.
pub fn secret_key() -> impl Strategy<Value = SecretKey> {
    any::<[u8; 32]>().prop_filter_map("scalar out of range", |bytes| {
        SecretKey::from_bytes(&bytes).ok()
    })
}

/// Generate a random key pair.
pub fn keys() -> impl Strategy<Value = Keys> {
    secret_key().prop_map(Keys::from_secret)
}

/// Generate a random EventId.
pub fn event_id() -> impl Strategy<Value = EventId> {
    any::<[u8; 32]>().prop_map(EventId::from_bytes)
}

/// Generate a group id.
pub fn group_id() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_-]{0,31}".prop_map(String::from)
}

/// Generate a reasonable creation time (Unix seconds).
pub fn created_at() -> impl Strategy<Value = u64> {
    0u64..=4_102_444_800
}

/// Generate a protocol kind.
pub fn kind() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(5u32),
        Just(7),
        Just(9),
        9000u32..=9009,
        Just(9021),
        Just(9022),
        39000u32..=39003,
    ]
}

/// Generate a tag of one to four arbitrary strings.
pub fn tag() -> impl Strategy<Value = Tag> {
    prop::collection::vec(any::<String>(), 1..=4).prop_map(Tag)
}

/// Generate event content, including control characters and non-ASCII.
pub fn content() -> impl Strategy<Value = String> {
    any::<String>()
}

/// Parameters for generating an event.
#[derive(Debug, Clone)]
pub struct EventParams {
    pub keys: Keys,
    pub created_at: u64,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl Arbitrary for EventParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            keys(),
            created_at(),
            kind(),
            prop::collection::vec(tag(), 0..6),
            content(),
        )
            .prop_map(|(keys, created_at, kind, tags, content)| EventParams {
                keys,
                created_at,
                kind,
                tags,
                content,
            })
            .boxed()
    }
}

/// Sign an event from parameters.
pub fn event_from_params(params: &EventParams) -> SignedEvent {
    EventBuilder::new(params.kind)
        .created_at(params.created_at)
        .tags(params.tags.clone())
        .content(params.content.clone())
        .sign(&params.keys)
        .expect("generated keys sign their own events")
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaygroups_core::{
        derive_public_key, normalize_for_signing, sign, validate_event, verify, verify_event,
    };

    proptest! {
        #[test]
        fn test_sign_then_verify(sk in secret_key(), hash in any::<[u8; 32]>()) {
            let sig = sign(&sk, &hash).unwrap();
            let pk = derive_public_key(&sk);
            prop_assert!(verify(sig.as_bytes(), &hash, pk.as_bytes()).unwrap());
        }

        #[test]
        fn test_normalization_keeps_public_key(sk in secret_key()) {
            let normalized = normalize_for_signing(&sk);
            prop_assert_eq!(derive_public_key(&normalized), derive_public_key(&sk));
        }

        #[test]
        fn test_signature_bound_to_hash(
            sk in secret_key(),
            hash in any::<[u8; 32]>(),
            bit in 0usize..256,
        ) {
            let sig = sign(&sk, &hash).unwrap();
            let pk = derive_public_key(&sk);
            let mut other = hash;
            other[bit / 8] ^= 1 << (bit % 8);
            prop_assert!(!verify(sig.as_bytes(), &other, pk.as_bytes()).unwrap());
        }

        #[test]
        fn test_signature_bound_to_key(a in keys(), b in keys(), hash in any::<[u8; 32]>()) {
            prop_assume!(a.public_key() != b.public_key());
            let sig = a.sign(&hash).unwrap();
            prop_assert!(!b.public_key().verify(&hash, &sig));
        }

        #[test]
        fn test_compressed_key_form_verifies(sk in secret_key(), hash in any::<[u8; 32]>()) {
            let sig = sign(&sk, &hash).unwrap();
            let pk = derive_public_key(&sk);
            for prefix in [0x02u8, 0x03] {
                let mut compressed = vec![prefix];
                compressed.extend_from_slice(pk.as_bytes());
                prop_assert!(verify(sig.as_bytes(), &hash, &compressed).unwrap());
            }
        }

        #[test]
        fn test_event_id_deterministic(params: EventParams) {
            let e1 = event_from_params(&params);
            let e2 = event_from_params(&params);
            prop_assert_eq!(e1.id(), e2.id());
            prop_assert_eq!(e1.recompute_id().unwrap(), *e1.id());
        }

        #[test]
        fn test_signed_events_verify(params: EventParams) {
            let event = event_from_params(&params);
            prop_assert!(verify_event(&event));
        }

        #[test]
        fn test_json_transport_keeps_validity(params: EventParams) {
            let event = event_from_params(&params);
            let parsed = SignedEvent::from_json(&event.to_json().unwrap()).unwrap();
            prop_assert!(validate_event(&parsed).is_ok());
            prop_assert_eq!(parsed, event);
        }

        #[test]
        fn test_content_change_changes_id(params: EventParams, other in content()) {
            prop_assume!(other != params.content);
            let e1 = event_from_params(&params);
            let e2 = event_from_params(&EventParams { content: other, ..params.clone() });
            prop_assert_ne!(e1.id(), e2.id());
        }

        #[test]
        fn test_hex_roundtrip(id in event_id()) {
            prop_assert_eq!(EventId::from_hex(&id.to_hex()).unwrap(), id);
        }
    }
}
