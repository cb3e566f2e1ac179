//! The group client: one identity publishing and querying group messages.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use relaygroups_catalog::{
    CatalogConfig, ClientMessage, Filter, GroupMetadata, GroupRequest, MessageCatalog, QueryWindow,
};
use relaygroups_core::{
    validate_event, Clock, Keys, OsRandom, PublicKey, RandomSource, SignedEvent, SystemClock,
};

use crate::error::{Error, Result};

/// Configuration for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Subscription ids, default reaction, invite code length.
    #[serde(flatten)]
    pub catalog: CatalogConfig,
    /// Whether to verify each event after signing it.
    pub verify_outgoing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            verify_outgoing: true,
        }
    }
}

impl ClientConfig {
    /// Parse from JSON. Absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}

/// A key pair bound to a message catalog.
///
/// Every publish method signs with the client's keys at the clock's current
/// time and returns the `["EVENT", ...]` envelope; every query method
/// returns a `["REQ", ...]` envelope. Nothing is sent: transport belongs to
/// the caller.
pub struct GroupClient<R: RandomSource = OsRandom, C: Clock = SystemClock> {
    /// The identity this client signs with.
    keys: Keys,
    catalog: MessageCatalog<R, C>,
    config: ClientConfig,
}

impl GroupClient<OsRandom, SystemClock> {
    /// A client with a fresh key pair, OS randomness and the system clock.
    pub fn generate(config: ClientConfig) -> Result<Self> {
        let keys = Keys::generate(&OsRandom)?;
        Ok(Self::new(keys, OsRandom, SystemClock, config))
    }
}

impl<R: RandomSource, C: Clock> GroupClient<R, C> {
    pub fn new(keys: Keys, random: R, clock: C, config: ClientConfig) -> Self {
        info!(pubkey = %keys.public_key(), "group client ready");
        Self {
            keys,
            catalog: MessageCatalog::new(random, clock, config.catalog.clone()),
            config,
        }
    }

    /// A client with keys drawn from `random`.
    pub fn with_generated_keys(random: R, clock: C, config: ClientConfig) -> Result<Self> {
        let keys = Keys::generate(&random)?;
        Ok(Self::new(keys, random, clock, config))
    }

    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }

    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MessageCatalog<R, C> {
        &self.catalog
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Publish
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign any group request.
    pub fn publish(&self, group_id: &str, request: GroupRequest) -> Result<ClientMessage> {
        self.finish(self.catalog.publish(&self.keys, group_id, request))
    }

    fn check_outgoing(&self, msg: &ClientMessage) -> Result<()> {
        if !self.config.verify_outgoing {
            return Ok(());
        }
        if let Some(event) = msg.event() {
            validate_event(event)?;
        }
        Ok(())
    }

    fn finish(&self, msg: relaygroups_catalog::Result<ClientMessage>) -> Result<ClientMessage> {
        let msg = msg?;
        self.check_outgoing(&msg)?;
        Ok(msg)
    }

    pub fn request_join(
        &self,
        group_id: &str,
        invite_code: Option<&str>,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(
            self.catalog
                .request_join(&self.keys, group_id, invite_code, reason),
        )
    }

    pub fn leave(&self, group_id: &str, reason: Option<&str>) -> Result<ClientMessage> {
        self.finish(self.catalog.leave(&self.keys, group_id, reason))
    }

    pub fn add_user(
        &self,
        group_id: &str,
        pubkey: &str,
        roles: &[&str],
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(
            self.catalog
                .add_user(&self.keys, group_id, pubkey, roles, reason),
        )
    }

    pub fn remove_user(
        &self,
        group_id: &str,
        pubkey: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(self.catalog.remove_user(&self.keys, group_id, pubkey, reason))
    }

    pub fn edit_metadata(
        &self,
        group_id: &str,
        metadata: GroupMetadata,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(
            self.catalog
                .edit_metadata(&self.keys, group_id, metadata, reason),
        )
    }

    pub fn delete_event(
        &self,
        group_id: &str,
        event_id: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(
            self.catalog
                .delete_event(&self.keys, group_id, event_id, reason),
        )
    }

    pub fn delete_message(
        &self,
        group_id: &str,
        event_id: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(
            self.catalog
                .delete_message(&self.keys, group_id, event_id, reason),
        )
    }

    pub fn create_group(&self, group_id: &str, metadata: GroupMetadata) -> Result<ClientMessage> {
        self.finish(self.catalog.create_group(&self.keys, group_id, metadata))
    }

    pub fn delete_group(&self, group_id: &str, reason: Option<&str>) -> Result<ClientMessage> {
        self.finish(self.catalog.delete_group(&self.keys, group_id, reason))
    }

    pub fn create_invite(
        &self,
        group_id: &str,
        code: Option<&str>,
        max_uses: Option<u32>,
        expiry_hours: Option<u64>,
    ) -> Result<ClientMessage> {
        self.finish(self.catalog.create_invite(
            &self.keys,
            group_id,
            code,
            max_uses,
            expiry_hours,
        ))
    }

    pub fn send_message(&self, group_id: &str, content: &str) -> Result<ClientMessage> {
        self.finish(self.catalog.send_message(&self.keys, group_id, content))
    }

    pub fn reply_message(
        &self,
        group_id: &str,
        content: &str,
        reply_to: &str,
        root_id: Option<&str>,
        reply_author: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(self.catalog.reply_message(
            &self.keys,
            group_id,
            content,
            reply_to,
            root_id,
            reply_author,
        ))
    }

    pub fn react(
        &self,
        group_id: &str,
        event_id: &str,
        author: Option<&str>,
        reaction: Option<&str>,
    ) -> Result<ClientMessage> {
        self.finish(
            self.catalog
                .react(&self.keys, group_id, event_id, author, reaction),
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscribe
    // ─────────────────────────────────────────────────────────────────────────

    pub fn group_messages(
        &self,
        group_id: &str,
        window: QueryWindow,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self
            .catalog
            .group_messages(group_id, window, subscription_id)?)
    }

    pub fn message_reactions(
        &self,
        event_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self.catalog.message_reactions(event_id, subscription_id)?)
    }

    /// Whether this client's own key is a member of the group.
    pub fn is_member(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        let pubkey = self.keys.public_key().to_hex();
        Ok(self.catalog.is_member(group_id, &pubkey, subscription_id)?)
    }

    pub fn group_metadata(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self.catalog.group_metadata(group_id, subscription_id)?)
    }

    pub fn group_admins(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self.catalog.group_admins(group_id, subscription_id)?)
    }

    pub fn group_members(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self.catalog.group_members(group_id, subscription_id)?)
    }

    pub fn group_roles(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self.catalog.group_roles(group_id, subscription_id)?)
    }

    pub fn moderation_events(
        &self,
        group_id: &str,
        window: QueryWindow,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self
            .catalog
            .moderation_events(group_id, window, subscription_id)?)
    }

    pub fn join_leave_requests(
        &self,
        group_id: &str,
        window: QueryWindow,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self
            .catalog
            .join_leave_requests(group_id, window, subscription_id)?)
    }

    pub fn custom_query(
        &self,
        filter: Filter,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        Ok(self.catalog.custom_query(filter, subscription_id)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Receive
    // ─────────────────────────────────────────────────────────────────────────

    /// Parse an event object received from a relay and verify it.
    ///
    /// Events that fail identity or signature checks are rejected whatever
    /// `verify_outgoing` says.
    pub fn receive(&self, json: &str) -> Result<SignedEvent> {
        let event = SignedEvent::from_json(json)?;
        validate_event(&event)?;
        debug!(id = %event.id(), kind = event.kind(), "accepted event");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaygroups_core::{FixedClock, SeededRandom, ValidationError};

    fn client() -> GroupClient<SeededRandom, FixedClock> {
        GroupClient::with_generated_keys(
            SeededRandom::new(11),
            FixedClock::from_secs(1_700_000_000),
            ClientConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.catalog.subscription_prefix, "sub");
        assert_eq!(config.catalog.custom_prefix, "custom");
        assert_eq!(config.catalog.default_reaction, "+");
        assert_eq!(config.catalog.default_message_limit, None);
        assert!(config.verify_outgoing);
    }

    #[test]
    fn test_config_from_json() {
        let config = ClientConfig::from_json_str(
            r#"{"default_reaction":"👍","verify_outgoing":false,"default_message_limit":25}"#,
        )
        .unwrap();
        assert_eq!(config.catalog.default_reaction, "👍");
        assert_eq!(config.catalog.default_message_limit, Some(25));
        assert_eq!(config.catalog.subscription_prefix, "sub");
        assert!(!config.verify_outgoing);

        assert!(ClientConfig::from_json_str("{}").unwrap().verify_outgoing);
        assert!(matches!(
            ClientConfig::from_json_str("[1]"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_published_events_use_client_keys() {
        let client = client();
        let msg = client.send_message("g1", "hi").unwrap();
        let event = msg.event().unwrap();
        assert_eq!(event.pubkey(), &client.public_key());
        assert_eq!(event.created_at(), 1_700_000_000);
    }

    #[test]
    fn test_is_member_uses_own_key() {
        let client = client();
        let msg = client.is_member("g1", Some("m")).unwrap();
        assert_eq!(
            msg.filter().unwrap().tag_values('p').unwrap(),
            [client.public_key().to_hex()]
        );
    }

    #[test]
    fn test_receive_roundtrip() {
        let client = client();
        let msg = client.send_message("g1", "hi").unwrap();
        let json = msg.event().unwrap().to_json().unwrap();
        let received = client.receive(&json).unwrap();
        assert_eq!(&received, msg.event().unwrap());
    }

    #[test]
    fn test_receive_rejects_tampered() {
        let client = client();
        let msg = client.send_message("g1", "hi").unwrap();
        let json = msg.event().unwrap().to_json().unwrap().replace("\"hi\"", "\"ho\"");
        assert!(matches!(
            client.receive(&json),
            Err(Error::Validation(ValidationError::IdMismatch { .. }))
        ));
        assert!(matches!(client.receive("{}"), Err(Error::Core(_))));
    }

    #[test]
    fn test_catalog_errors_propagate() {
        assert!(matches!(
            client().leave("", None),
            Err(Error::Catalog(_))
        ));
    }
}
