//! The group action table.
//!
//! Each supported action is one [`ActionSpec`] record in [`ACTIONS`]: its
//! kind, the tag carrying the group id and where its free text goes. A
//! [`GroupRequest`] carries the action's parameters; [`build_tags`] turns
//! both into the event's tag list.
//!
//! Optional parameters that are absent produce no tag.

use relaygroups_core::Tag;

use crate::error::{CatalogError, Result};
use crate::kinds::Kind;

const SECS_PER_HOUR: u64 = 3600;

/// A publishable group action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    RequestJoin,
    Leave,
    AddUser,
    RemoveUser,
    EditMetadata,
    DeleteEvent,
    DeleteMessage,
    CreateGroup,
    DeleteGroup,
    CreateInvite,
    SendMessage,
    ReplyMessage,
    React,
}

/// Which tag carries the group id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupScope {
    /// `["h", group]`: an action inside an existing group.
    H,
    /// `["d", group]`: an action defining the group itself.
    D,
}

impl GroupScope {
    pub fn tag_name(self) -> &'static str {
        match self {
            GroupScope::H => "h",
            GroupScope::D => "d",
        }
    }
}

/// Where the request's free text goes in the event content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRule {
    /// Optional reason; empty content when absent.
    Reason,
    /// The message text.
    Text,
    /// The reaction, or the configured default.
    Reaction,
}

/// One entry of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub action: Action,
    pub name: &'static str,
    pub kind: Kind,
    pub scope: GroupScope,
    pub content: ContentRule,
}

const fn spec(
    action: Action,
    name: &'static str,
    kind: Kind,
    scope: GroupScope,
    content: ContentRule,
) -> ActionSpec {
    ActionSpec {
        action,
        name,
        kind,
        scope,
        content,
    }
}

/// The action table, indexed by `Action as usize`.
#[rustfmt::skip]
pub static ACTIONS: [ActionSpec; 13] = [
    spec(Action::RequestJoin, "request-join", Kind::JoinRequest, GroupScope::H, ContentRule::Reason),
    spec(Action::Leave, "leave", Kind::LeaveRequest, GroupScope::H, ContentRule::Reason),
    spec(Action::AddUser, "add-user", Kind::PutUser, GroupScope::H, ContentRule::Reason),
    spec(Action::RemoveUser, "remove-user", Kind::RemoveUser, GroupScope::H, ContentRule::Reason),
    spec(Action::EditMetadata, "edit-metadata", Kind::EditMetadata, GroupScope::H, ContentRule::Reason),
    spec(Action::DeleteEvent, "delete-event", Kind::DeleteEvent, GroupScope::H, ContentRule::Reason),
    spec(Action::DeleteMessage, "delete-message", Kind::Deletion, GroupScope::H, ContentRule::Reason),
    spec(Action::CreateGroup, "create-group", Kind::CreateGroup, GroupScope::D, ContentRule::Reason),
    spec(Action::DeleteGroup, "delete-group", Kind::DeleteGroup, GroupScope::H, ContentRule::Reason),
    spec(Action::CreateInvite, "create-invite", Kind::CreateInvite, GroupScope::H, ContentRule::Reason),
    spec(Action::SendMessage, "send-message", Kind::ChatMessage, GroupScope::H, ContentRule::Text),
    spec(Action::ReplyMessage, "reply-message", Kind::ChatMessage, GroupScope::H, ContentRule::Text),
    spec(Action::React, "react", Kind::Reaction, GroupScope::H, ContentRule::Reaction),
];

impl Action {
    pub const ALL: [Action; 13] = [
        Action::RequestJoin,
        Action::Leave,
        Action::AddUser,
        Action::RemoveUser,
        Action::EditMetadata,
        Action::DeleteEvent,
        Action::DeleteMessage,
        Action::CreateGroup,
        Action::DeleteGroup,
        Action::CreateInvite,
        Action::SendMessage,
        Action::ReplyMessage,
        Action::React,
    ];

    /// This action's table entry.
    pub fn spec(self) -> &'static ActionSpec {
        &ACTIONS[self as usize]
    }

    pub fn kind(self) -> Kind {
        self.spec().kind
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Look up an action by its table name.
    pub fn from_name(name: &str) -> Option<Action> {
        ACTIONS.iter().find(|s| s.name == name).map(|s| s.action)
    }
}

/// Group metadata fields. Each present field contributes exactly one tag.
///
/// `is_public` and `is_open` are tri-state: `Some(true)` emits `public` /
/// `open`, `Some(false)` emits `private` / `closed`, `None` emits nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupMetadata {
    pub name: Option<String>,
    pub about: Option<String>,
    pub picture: Option<String>,
    pub is_public: Option<bool>,
    pub is_open: Option<bool>,
}

impl GroupMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    pub fn picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = Some(picture.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = Some(is_public);
        self
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.is_open = Some(is_open);
        self
    }

    /// Tags in fixed order: name, about, picture, visibility, access.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags = Vec::new();
        if let Some(name) = &self.name {
            tags.push(Tag::new(["name", name.as_str()]));
        }
        if let Some(about) = &self.about {
            tags.push(Tag::new(["about", about.as_str()]));
        }
        if let Some(picture) = &self.picture {
            tags.push(Tag::new(["picture", picture.as_str()]));
        }
        match self.is_public {
            Some(true) => tags.push(Tag::new(["public"])),
            Some(false) => tags.push(Tag::new(["private"])),
            None => {}
        }
        match self.is_open {
            Some(true) => tags.push(Tag::new(["open"])),
            Some(false) => tags.push(Tag::new(["closed"])),
            None => {}
        }
        tags
    }
}

/// An action together with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRequest {
    RequestJoin {
        invite_code: Option<String>,
        reason: Option<String>,
    },
    Leave {
        reason: Option<String>,
    },
    AddUser {
        pubkey: String,
        roles: Vec<String>,
        reason: Option<String>,
    },
    RemoveUser {
        pubkey: String,
        reason: Option<String>,
    },
    EditMetadata {
        metadata: GroupMetadata,
        reason: Option<String>,
    },
    DeleteEvent {
        event_id: String,
        reason: Option<String>,
    },
    DeleteMessage {
        event_id: String,
        reason: Option<String>,
    },
    CreateGroup {
        metadata: GroupMetadata,
        reason: Option<String>,
    },
    DeleteGroup {
        reason: Option<String>,
    },
    /// `code: None` publishes without a code tag; the catalog fills in a
    /// generated code before building.
    CreateInvite {
        code: Option<String>,
        max_uses: Option<u32>,
        expiry_hours: Option<u64>,
        reason: Option<String>,
    },
    SendMessage {
        content: String,
    },
    /// `root_id` equal to `reply_to` is treated as absent.
    ReplyMessage {
        content: String,
        reply_to: String,
        root_id: Option<String>,
        reply_author: Option<String>,
    },
    React {
        event_id: String,
        author: Option<String>,
        reaction: Option<String>,
    },
}

impl GroupRequest {
    pub fn action(&self) -> Action {
        match self {
            GroupRequest::RequestJoin { .. } => Action::RequestJoin,
            GroupRequest::Leave { .. } => Action::Leave,
            GroupRequest::AddUser { .. } => Action::AddUser,
            GroupRequest::RemoveUser { .. } => Action::RemoveUser,
            GroupRequest::EditMetadata { .. } => Action::EditMetadata,
            GroupRequest::DeleteEvent { .. } => Action::DeleteEvent,
            GroupRequest::DeleteMessage { .. } => Action::DeleteMessage,
            GroupRequest::CreateGroup { .. } => Action::CreateGroup,
            GroupRequest::DeleteGroup { .. } => Action::DeleteGroup,
            GroupRequest::CreateInvite { .. } => Action::CreateInvite,
            GroupRequest::SendMessage { .. } => Action::SendMessage,
            GroupRequest::ReplyMessage { .. } => Action::ReplyMessage,
            GroupRequest::React { .. } => Action::React,
        }
    }

    /// The free text the action's [`ContentRule`] selects.
    pub fn text(&self) -> Option<&str> {
        match self {
            GroupRequest::RequestJoin { reason, .. }
            | GroupRequest::Leave { reason }
            | GroupRequest::AddUser { reason, .. }
            | GroupRequest::RemoveUser { reason, .. }
            | GroupRequest::EditMetadata { reason, .. }
            | GroupRequest::DeleteEvent { reason, .. }
            | GroupRequest::DeleteMessage { reason, .. }
            | GroupRequest::CreateGroup { reason, .. }
            | GroupRequest::DeleteGroup { reason }
            | GroupRequest::CreateInvite { reason, .. } => reason.as_deref(),
            GroupRequest::SendMessage { content } | GroupRequest::ReplyMessage { content, .. } => {
                Some(content.as_str())
            }
            GroupRequest::React { reaction, .. } => reaction.as_deref(),
        }
    }

    /// The event content, with `default_reaction` for reactions without one.
    pub fn content(&self, default_reaction: &str) -> String {
        match (self.action().spec().content, self.text()) {
            (_, Some(text)) => text.to_string(),
            (ContentRule::Reaction, None) => default_reaction.to_string(),
            (ContentRule::Reason | ContentRule::Text, None) => String::new(),
        }
    }

    /// Check the parameters that must be non-empty.
    pub fn validate(&self) -> Result<()> {
        let required = match self {
            GroupRequest::AddUser { pubkey, .. } | GroupRequest::RemoveUser { pubkey, .. } => {
                Some(("pubkey", pubkey))
            }
            GroupRequest::DeleteEvent { event_id, .. }
            | GroupRequest::DeleteMessage { event_id, .. }
            | GroupRequest::React { event_id, .. } => Some(("event id", event_id)),
            GroupRequest::ReplyMessage { reply_to, .. } => Some(("reply target", reply_to)),
            GroupRequest::RequestJoin {
                invite_code: Some(code),
                ..
            }
            | GroupRequest::CreateInvite {
                code: Some(code), ..
            } => Some(("invite code", code)),
            _ => None,
        };
        match required {
            Some((what, value)) if value.is_empty() => Err(CatalogError::InvalidParameter(
                format!("{} requires a non-empty {what}", self.action().name()),
            )),
            _ => Ok(()),
        }
    }

    /// Action-specific tags, in their fixed order. `now` is Unix seconds.
    pub fn action_tags(&self, now: u64) -> Vec<Tag> {
        let mut tags = Vec::new();
        match self {
            GroupRequest::RequestJoin { invite_code, .. } => {
                if let Some(code) = invite_code {
                    tags.push(Tag::new(["code", code.as_str()]));
                }
            }
            GroupRequest::AddUser { pubkey, roles, .. } => {
                let mut tag = vec!["p".to_string(), pubkey.clone()];
                tag.extend(roles.iter().cloned());
                tags.push(Tag(tag));
            }
            GroupRequest::RemoveUser { pubkey, .. } => {
                tags.push(Tag::new(["p", pubkey.as_str()]));
            }
            GroupRequest::EditMetadata { metadata, .. }
            | GroupRequest::CreateGroup { metadata, .. } => {
                tags.extend(metadata.tags());
            }
            GroupRequest::DeleteEvent { event_id, .. }
            | GroupRequest::DeleteMessage { event_id, .. } => {
                tags.push(Tag::new(["e", event_id.as_str()]));
            }
            GroupRequest::CreateInvite {
                code,
                max_uses,
                expiry_hours,
                ..
            } => {
                if let Some(code) = code {
                    tags.push(Tag::new(["code", code.as_str()]));
                }
                if let Some(max_uses) = max_uses {
                    tags.push(Tag::new(["max_uses".to_string(), max_uses.to_string()]));
                }
                if let Some(hours) = expiry_hours {
                    let expiration = now.saturating_add(hours.saturating_mul(SECS_PER_HOUR));
                    tags.push(Tag::new(["expiration".to_string(), expiration.to_string()]));
                }
            }
            GroupRequest::ReplyMessage {
                reply_to,
                root_id,
                reply_author,
                ..
            } => {
                if let Some(root) = root_id.as_deref().filter(|r| *r != reply_to.as_str()) {
                    tags.push(Tag::new(["e", root, "", "root"]));
                }
                tags.push(Tag::new(["e", reply_to.as_str(), "", "reply"]));
                if let Some(author) = reply_author {
                    tags.push(Tag::new(["p", author.as_str()]));
                }
            }
            GroupRequest::React {
                event_id, author, ..
            } => {
                tags.push(Tag::new(["e", event_id.as_str()]));
                if let Some(author) = author {
                    tags.push(Tag::new(["p", author.as_str()]));
                }
            }
            GroupRequest::Leave { .. }
            | GroupRequest::DeleteGroup { .. }
            | GroupRequest::SendMessage { .. } => {}
        }
        tags
    }
}

/// The full tag list: the group tag first, then the action's tags.
pub fn build_tags(group_id: &str, request: &GroupRequest, now: u64) -> Result<Vec<Tag>> {
    if group_id.is_empty() {
        return Err(CatalogError::InvalidParameter(
            "group id must not be empty".into(),
        ));
    }
    request.validate()?;

    let scope = request.action().spec().scope;
    let mut tags = vec![Tag::new([scope.tag_name(), group_id])];
    tags.extend(request.action_tags(now));
    Ok(tags)
}
