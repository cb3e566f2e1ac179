//! Event kinds used by relay-based groups.

/// A protocol-defined event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Kind {
    // User content
    /// Deletion request for earlier events.
    Deletion = 5,
    /// Reaction to an event.
    Reaction = 7,
    /// Group chat message.
    ChatMessage = 9,

    // Moderation (9000 - 9020)
    /// Add a user, or update their roles.
    PutUser = 9000,
    RemoveUser = 9001,
    EditMetadata = 9002,
    DeleteEvent = 9005,
    CreateGroup = 9007,
    DeleteGroup = 9008,
    CreateInvite = 9009,

    // User requests (9021 - 9022)
    JoinRequest = 9021,
    LeaveRequest = 9022,

    // Relay-published group state (39000 - 39003)
    GroupMetadata = 39000,
    GroupAdmins = 39001,
    GroupMembers = 39002,
    GroupRoles = 39003,
}

impl Kind {
    /// All moderation kinds, ascending.
    pub const MODERATION: [Kind; 7] = [
        Kind::PutUser,
        Kind::RemoveUser,
        Kind::EditMetadata,
        Kind::DeleteEvent,
        Kind::CreateGroup,
        Kind::DeleteGroup,
        Kind::CreateInvite,
    ];

    /// Convert to the numeric kind.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Try to parse from the numeric kind.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            5 => Some(Self::Deletion),
            7 => Some(Self::Reaction),
            9 => Some(Self::ChatMessage),
            9000 => Some(Self::PutUser),
            9001 => Some(Self::RemoveUser),
            9002 => Some(Self::EditMetadata),
            9005 => Some(Self::DeleteEvent),
            9007 => Some(Self::CreateGroup),
            9008 => Some(Self::DeleteGroup),
            9009 => Some(Self::CreateInvite),
            9021 => Some(Self::JoinRequest),
            9022 => Some(Self::LeaveRequest),
            39000 => Some(Self::GroupMetadata),
            39001 => Some(Self::GroupAdmins),
            39002 => Some(Self::GroupMembers),
            39003 => Some(Self::GroupRoles),
            _ => None,
        }
    }

    /// Check if this is a moderation kind.
    pub fn is_moderation(self) -> bool {
        (9000..=9020).contains(&self.as_u32())
    }

    /// Check if this is a join or leave request.
    pub fn is_user_request(self) -> bool {
        matches!(self, Kind::JoinRequest | Kind::LeaveRequest)
    }

    /// Check if this is relay-published group state (addressable by `d`).
    pub fn is_group_state(self) -> bool {
        (39000..=39003).contains(&self.as_u32())
    }
}

impl From<Kind> for u32 {
    fn from(kind: Kind) -> Self {
        kind.as_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Kind; 16] = [
        Kind::Deletion,
        Kind::Reaction,
        Kind::ChatMessage,
        Kind::PutUser,
        Kind::RemoveUser,
        Kind::EditMetadata,
        Kind::DeleteEvent,
        Kind::CreateGroup,
        Kind::DeleteGroup,
        Kind::CreateInvite,
        Kind::JoinRequest,
        Kind::LeaveRequest,
        Kind::GroupMetadata,
        Kind::GroupAdmins,
        Kind::GroupMembers,
        Kind::GroupRoles,
    ];

    #[test]
    fn test_kind_roundtrip() {
        for kind in ALL {
            assert_eq!(Kind::from_u32(kind.as_u32()), Some(kind));
        }
        assert_eq!(Kind::from_u32(1), None);
        assert_eq!(Kind::from_u32(9003), None);
    }

    #[test]
    fn test_kind_values() {
        assert_eq!(Kind::ChatMessage.as_u32(), 9);
        assert_eq!(Kind::PutUser.as_u32(), 9000);
        assert_eq!(Kind::GroupRoles.as_u32(), 39003);
        assert_eq!(u32::from(Kind::Deletion), 5);
    }

    #[test]
    fn test_kind_categories() {
        for kind in Kind::MODERATION {
            assert!(kind.is_moderation());
            assert!(!kind.is_group_state());
        }
        assert!(!Kind::JoinRequest.is_moderation());
        assert!(Kind::JoinRequest.is_user_request());
        assert!(Kind::LeaveRequest.is_user_request());
        assert!(Kind::GroupMembers.is_group_state());
        assert!(!Kind::ChatMessage.is_group_state());
    }
}
