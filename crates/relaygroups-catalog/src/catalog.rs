//! The message catalog: group actions and queries as wire envelopes.
//!
//! Every builder is a pure transformation from its parameters, the clock's
//! current time and (for invite codes only) the random source, to one
//! [`ClientMessage`]. Nothing is remembered between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use relaygroups_core::{Clock, EventBuilder, Keys, RandomSource};

use crate::actions::{build_tags, GroupMetadata, GroupRequest};
use crate::error::{CatalogError, Result};
use crate::filter::Filter;
use crate::invite::{generate_invite_code, INVITE_CODE_LEN};
use crate::kinds::Kind;
use crate::messages::{ClientMessage, SubscriptionIdGenerator};

/// Configuration for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Prefix of generated ids for the named queries.
    pub subscription_prefix: String,
    /// Prefix of generated ids for custom queries.
    pub custom_prefix: String,
    /// Reaction content when none is given.
    pub default_reaction: String,
    /// Limit for group message queries that do not set one.
    pub default_message_limit: Option<u64>,
    /// Length of generated invite codes.
    pub invite_code_len: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            subscription_prefix: "sub".to_string(),
            custom_prefix: "custom".to_string(),
            default_reaction: "+".to_string(),
            default_message_limit: None,
            invite_code_len: INVITE_CODE_LEN,
        }
    }
}

/// Optional time bounds and count limit for message queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryWindow {
    pub since: Option<u64>,
    pub until: Option<u64>,
    pub limit: Option<u64>,
}

impl QueryWindow {
    pub fn limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    fn apply(&self, mut filter: Filter) -> Filter {
        if let Some(since) = self.since {
            filter = filter.since(since);
        }
        if let Some(until) = self.until {
            filter = filter.until(until);
        }
        if let Some(limit) = self.limit {
            filter = filter.limit(limit);
        }
        filter
    }
}

/// Builds publish and subscribe envelopes for relay-based groups.
pub struct MessageCatalog<R: RandomSource, C: Clock> {
    random: R,
    clock: C,
    config: CatalogConfig,
    subscription_ids: SubscriptionIdGenerator,
    custom_ids: SubscriptionIdGenerator,
}

impl<R: RandomSource, C: Clock> MessageCatalog<R, C> {
    pub fn new(random: R, clock: C, config: CatalogConfig) -> Self {
        let subscription_ids = SubscriptionIdGenerator::new(config.subscription_prefix.clone());
        let custom_ids = SubscriptionIdGenerator::new(config.custom_prefix.clone());
        Self {
            random,
            clock,
            config,
            subscription_ids,
            custom_ids,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn random(&self) -> &R {
        &self.random
    }

    /// Generate an invite code with the configured length.
    pub fn invite_code(&self) -> Result<String> {
        Ok(generate_invite_code(&self.random, self.config.invite_code_len)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Publish
    // ─────────────────────────────────────────────────────────────────────────

    /// Sign `request` for `group_id` and wrap it as `["EVENT", ...]`.
    ///
    /// This is the single builder behind every action helper below.
    pub fn publish(
        &self,
        keys: &Keys,
        group_id: &str,
        mut request: GroupRequest,
    ) -> Result<ClientMessage> {
        if let GroupRequest::CreateInvite { code: code @ None, .. } = &mut request {
            *code = Some(self.invite_code()?);
        }

        let now = self.clock.now_secs();
        let spec = request.action().spec();
        let tags = build_tags(group_id, &request, now)?;
        let content = request.content(&self.config.default_reaction);

        let event = EventBuilder::new(spec.kind.as_u32())
            .created_at(now)
            .tags(tags)
            .content(content)
            .sign(keys)?;

        debug!(
            action = spec.name,
            kind = event.kind(),
            group = group_id,
            id = %event.id(),
            "built group event"
        );
        Ok(ClientMessage::Event(event))
    }

    pub fn request_join(
        &self,
        keys: &Keys,
        group_id: &str,
        invite_code: Option<&str>,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::RequestJoin {
            invite_code: invite_code.map(str::to_string),
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    pub fn leave(
        &self,
        keys: &Keys,
        group_id: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::Leave {
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    /// Add a user, or replace their roles.
    pub fn add_user(
        &self,
        keys: &Keys,
        group_id: &str,
        pubkey: &str,
        roles: &[&str],
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::AddUser {
            pubkey: pubkey.to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    pub fn remove_user(
        &self,
        keys: &Keys,
        group_id: &str,
        pubkey: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::RemoveUser {
            pubkey: pubkey.to_string(),
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    pub fn edit_metadata(
        &self,
        keys: &Keys,
        group_id: &str,
        metadata: GroupMetadata,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::EditMetadata {
            metadata,
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    /// Moderator deletion of any event in the group (kind 9005).
    pub fn delete_event(
        &self,
        keys: &Keys,
        group_id: &str,
        event_id: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::DeleteEvent {
            event_id: event_id.to_string(),
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    /// Author deletion of their own message (kind 5).
    pub fn delete_message(
        &self,
        keys: &Keys,
        group_id: &str,
        event_id: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::DeleteMessage {
            event_id: event_id.to_string(),
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    pub fn create_group(
        &self,
        keys: &Keys,
        group_id: &str,
        metadata: GroupMetadata,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::CreateGroup {
            metadata,
            reason: None,
        };
        self.publish(keys, group_id, request)
    }

    pub fn delete_group(
        &self,
        keys: &Keys,
        group_id: &str,
        reason: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::DeleteGroup {
            reason: reason.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    /// Create an invite. A code is generated when `code` is `None`.
    pub fn create_invite(
        &self,
        keys: &Keys,
        group_id: &str,
        code: Option<&str>,
        max_uses: Option<u32>,
        expiry_hours: Option<u64>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::CreateInvite {
            code: code.map(str::to_string),
            max_uses,
            expiry_hours,
            reason: None,
        };
        self.publish(keys, group_id, request)
    }

    pub fn send_message(
        &self,
        keys: &Keys,
        group_id: &str,
        content: &str,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::SendMessage {
            content: content.to_string(),
        };
        self.publish(keys, group_id, request)
    }

    /// Reply to `reply_to`, threading under `root_id` when it differs.
    pub fn reply_message(
        &self,
        keys: &Keys,
        group_id: &str,
        content: &str,
        reply_to: &str,
        root_id: Option<&str>,
        reply_author: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::ReplyMessage {
            content: content.to_string(),
            reply_to: reply_to.to_string(),
            root_id: root_id.map(str::to_string),
            reply_author: reply_author.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    pub fn react(
        &self,
        keys: &Keys,
        group_id: &str,
        event_id: &str,
        author: Option<&str>,
        reaction: Option<&str>,
    ) -> Result<ClientMessage> {
        let request = GroupRequest::React {
            event_id: event_id.to_string(),
            author: author.map(str::to_string),
            reaction: reaction.map(str::to_string),
        };
        self.publish(keys, group_id, request)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Subscribe
    // ─────────────────────────────────────────────────────────────────────────

    fn subscribe(
        &self,
        ids: &SubscriptionIdGenerator,
        subscription_id: Option<&str>,
        filter: Filter,
    ) -> Result<ClientMessage> {
        filter.validate()?;
        let subscription_id = ids.resolve(subscription_id, &self.clock);
        debug!(subscription_id = %subscription_id, "built subscription");
        Ok(ClientMessage::req(subscription_id, filter))
    }

    fn named_query(&self, subscription_id: Option<&str>, filter: Filter) -> Result<ClientMessage> {
        self.subscribe(&self.subscription_ids, subscription_id, filter)
    }

    /// Chat messages of a group. The configured default limit applies when
    /// `window` sets none.
    pub fn group_messages(
        &self,
        group_id: &str,
        window: QueryWindow,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        require_group(group_id)?;
        let window = QueryWindow {
            limit: window.limit.or(self.config.default_message_limit),
            ..window
        };
        let filter = window.apply(Filter::new().kind(Kind::ChatMessage).tag('h', [group_id]));
        self.named_query(subscription_id, filter)
    }

    pub fn message_reactions(
        &self,
        event_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        if event_id.is_empty() {
            return Err(CatalogError::InvalidParameter(
                "event id must not be empty".into(),
            ));
        }
        let filter = Filter::new().kind(Kind::Reaction).tag('e', [event_id]);
        self.named_query(subscription_id, filter)
    }

    /// Whether `pubkey` appears in the group's member list.
    pub fn is_member(
        &self,
        group_id: &str,
        pubkey: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        require_group(group_id)?;
        if pubkey.is_empty() {
            return Err(CatalogError::InvalidParameter(
                "membership check requires a non-empty pubkey".into(),
            ));
        }
        let filter = Filter::new()
            .kind(Kind::GroupMembers)
            .tag('d', [group_id])
            .tag('p', [pubkey]);
        self.named_query(subscription_id, filter)
    }

    pub fn group_metadata(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        self.group_state(Kind::GroupMetadata, group_id, subscription_id)
    }

    pub fn group_admins(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        self.group_state(Kind::GroupAdmins, group_id, subscription_id)
    }

    pub fn group_members(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        self.group_state(Kind::GroupMembers, group_id, subscription_id)
    }

    pub fn group_roles(
        &self,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        self.group_state(Kind::GroupRoles, group_id, subscription_id)
    }

    fn group_state(
        &self,
        kind: Kind,
        group_id: &str,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        require_group(group_id)?;
        let filter = Filter::new().kind(kind).tag('d', [group_id]);
        self.named_query(subscription_id, filter)
    }

    pub fn moderation_events(
        &self,
        group_id: &str,
        window: QueryWindow,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        require_group(group_id)?;
        let filter = window.apply(Filter::new().kinds(Kind::MODERATION).tag('h', [group_id]));
        self.named_query(subscription_id, filter)
    }

    pub fn join_leave_requests(
        &self,
        group_id: &str,
        window: QueryWindow,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        require_group(group_id)?;
        let filter = window.apply(
            Filter::new()
                .kinds([Kind::JoinRequest, Kind::LeaveRequest])
                .tag('h', [group_id]),
        );
        self.named_query(subscription_id, filter)
    }

    /// Any filter. Generated ids use the custom prefix.
    pub fn custom_query(
        &self,
        filter: Filter,
        subscription_id: Option<&str>,
    ) -> Result<ClientMessage> {
        self.subscribe(&self.custom_ids, subscription_id, filter)
    }
}

fn require_group(group_id: &str) -> Result<()> {
    if group_id.is_empty() {
        return Err(CatalogError::InvalidParameter(
            "group id must not be empty".into(),
        ));
    }
    Ok(())
}
