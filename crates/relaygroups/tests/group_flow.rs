//! End-to-end group flows: build envelopes on one side, receive and verify
//! them on the other.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use relaygroups::core::{FixedClock, OsRandom, SeededRandom, SystemClock};
use relaygroups::{
    ClientConfig, ClientMessage, Error, Filter, GroupClient, GroupMetadata, Kind, QueryWindow,
};
use relaygroups_testkit::fixtures::{multi_party_fixtures, FIXTURE_TIME_SECS};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn client(seed: u64) -> GroupClient<SeededRandom, FixedClock> {
    GroupClient::with_generated_keys(
        SeededRandom::new(seed),
        FixedClock::from_secs(FIXTURE_TIME_SECS),
        ClientConfig::default(),
    )
    .unwrap()
}

fn wire(msg: &ClientMessage) -> String {
    msg.event().unwrap().to_json().unwrap()
}

#[test]
fn test_admin_and_member_flow() {
    init_tracing();
    let admin = client(1);
    let member = client(2);
    let member_pk = member.public_key().to_hex();

    // Admin creates the group and an invite
    let create = admin
        .create_group("rust", GroupMetadata::new().name("Rust").public(true).open(false))
        .unwrap();
    let invite = admin.create_invite("rust", None, Some(1), Some(24)).unwrap();
    let code = invite
        .event()
        .unwrap()
        .tags_named("code")
        .next()
        .and_then(|t| t.value())
        .unwrap()
        .to_string();

    // Member joins with the code and speaks
    let join = member.request_join("rust", Some(&code), Some("hi all")).unwrap();
    let hello = member.send_message("rust", "hello").unwrap();

    // Admin adds the member and replies
    let add = admin.add_user("rust", &member_pk, &["member"], None).unwrap();
    let hello_id = hello.event().unwrap().id().to_hex();
    let reply = admin
        .reply_message("rust", "welcome", &hello_id, None, Some(&member_pk))
        .unwrap();

    // Everything verifies on the receiving side
    for msg in [&create, &invite, &join, &hello, &add, &reply] {
        let received = member.receive(&wire(msg)).unwrap();
        assert_eq!(Some(&received), msg.event());
    }

    let kinds: Vec<_> = [&create, &invite, &join, &hello, &add, &reply]
        .iter()
        .map(|m| Kind::from_u32(m.event().unwrap().kind()).unwrap())
        .collect();
    assert_eq!(
        kinds,
        [
            Kind::CreateGroup,
            Kind::CreateInvite,
            Kind::JoinRequest,
            Kind::ChatMessage,
            Kind::PutUser,
            Kind::ChatMessage,
        ]
    );

    let join_event = join.event().unwrap();
    assert_eq!(join_event.tags_named("code").next().unwrap().value(), Some(code.as_str()));
    assert_eq!(join_event.content(), "hi all");

    let expiration = invite.event().unwrap().tags_named("expiration").next().unwrap();
    assert_eq!(
        expiration.value(),
        Some((FIXTURE_TIME_SECS + 24 * 3600).to_string().as_str())
    );
}

#[test]
fn test_reactions_and_deletions() {
    let alice = client(3);
    let bob = client(4);

    let msg = alice.send_message("g1", "hot take").unwrap();
    let id = msg.event().unwrap().id().to_hex();
    let author = alice.public_key().to_hex();

    let like = bob.react("g1", &id, Some(&author), None).unwrap();
    let fire = bob.react("g1", &id, Some(&author), Some("🔥")).unwrap();
    assert_eq!(like.event().unwrap().content(), "+");
    assert_eq!(fire.event().unwrap().content(), "🔥");

    let retract = alice.delete_message("g1", &id, Some("oops")).unwrap();
    let moderate = bob.delete_event("g1", &id, None).unwrap();
    assert_eq!(retract.event().unwrap().kind(), 5);
    assert_eq!(moderate.event().unwrap().kind(), 9005);
    for deletion in [&retract, &moderate] {
        let e = deletion.event().unwrap().tags_named("e").next().unwrap();
        assert_eq!(e.value(), Some(id.as_str()));
    }

    let reactions = bob.message_reactions(&id, Some("r")).unwrap();
    assert_eq!(
        reactions.to_value().unwrap(),
        serde_json::json!(["REQ", "r", {"kinds": [7], "#e": [id]}])
    );
}

#[test]
fn test_queries() {
    let c = client(5);
    let window = QueryWindow {
        since: Some(100),
        until: Some(200),
        limit: Some(20),
    };

    let msg = c.group_messages("g1", window, Some("m")).unwrap();
    let filter = msg.filter().unwrap();
    assert_eq!(filter.kinds_list(), Some(&[9u32][..]));
    assert_eq!(filter.since_value(), Some(100));
    assert_eq!(filter.until_value(), Some(200));
    assert_eq!(filter.limit_value(), Some(20));

    let msg = c.custom_query(Filter::new().authors([c.public_key().to_hex()]), None).unwrap();
    assert!(msg.subscription_id().unwrap().starts_with("custom-"));

    let msg = c.moderation_events("g1", QueryWindow::default(), None).unwrap();
    assert!(msg.subscription_id().unwrap().starts_with("sub-"));
    assert_eq!(msg.filter().unwrap().kinds_list().unwrap().len(), 7);
}

#[test]
fn test_leave_and_delete_group() {
    let c = client(6);
    let leave = c.leave("g1", None).unwrap();
    let delete = c.delete_group("g1", Some("done")).unwrap();
    let remove = c.remove_user("g1", "abcd", None).unwrap();
    assert_eq!(leave.event().unwrap().kind(), 9022);
    assert_eq!(leave.event().unwrap().content(), "");
    assert_eq!(delete.event().unwrap().kind(), 9008);
    assert_eq!(delete.event().unwrap().content(), "done");
    assert_eq!(remove.event().unwrap().kind(), 9001);
}

#[test]
fn test_invalid_parameters() {
    let c = client(7);
    assert!(matches!(c.send_message("", "x"), Err(Error::Catalog(_))));
    assert!(matches!(c.react("g1", "", None, None), Err(Error::Catalog(_))));
    assert!(matches!(c.group_roles("", None), Err(Error::Catalog(_))));
    assert!(matches!(
        c.custom_query(Filter::new().since(5).until(1), None),
        Err(Error::Catalog(_))
    ));
}

#[test]
fn test_concurrent_signing_is_independent() {
    // One shared random source, many signers on many threads.
    let random = Arc::new(OsRandom);
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let random = Arc::clone(&random);
            thread::spawn(move || {
                let client = GroupClient::with_generated_keys(
                    &*random,
                    SystemClock,
                    ClientConfig::default(),
                )
                .unwrap();
                (0..20)
                    .map(|n| {
                        let msg = client.send_message("g1", &format!("{i}-{n}")).unwrap();
                        wire(&msg)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let receiver = client(8);
    let mut pubkeys = std::collections::HashSet::new();
    for handle in handles {
        for json in handle.join().unwrap() {
            let event = receiver.receive(&json).unwrap();
            pubkeys.insert(event.pubkey().to_hex());
        }
    }
    assert_eq!(pubkeys.len(), 8);
}

#[test]
fn test_shared_client_across_threads() {
    let fixtures = multi_party_fixtures(1);
    let fixture = Arc::new(fixtures.into_iter().next().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let fixture = Arc::clone(&fixture);
            thread::spawn(move || {
                fixture
                    .catalog
                    .create_invite(&fixture.keys, "g1", None, None, None)
                    .map(|m| m.event().unwrap().tags_named("code").next().unwrap().0[1].clone())
                    .unwrap_or_else(|e| panic!("thread {i}: {e}"))
            })
        })
        .collect();

    let codes: std::collections::HashSet<_> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(codes.len(), 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_any_message_survives_the_wire(
        seed in any::<u64>(),
        group in "[a-z0-9]{1,16}",
        text in any::<String>(),
    ) {
        let sender = client(seed);
        let msg = sender.send_message(&group, &text).unwrap();
        let received = client(seed.wrapping_add(1)).receive(&wire(&msg)).unwrap();
        prop_assert_eq!(received.content(), text.as_str());
        prop_assert_eq!(received.pubkey(), &sender.public_key());
        let scope = received.tags_named("h").next().and_then(|t| t.value());
        prop_assert_eq!(scope, Some(group.as_str()));
    }
}
