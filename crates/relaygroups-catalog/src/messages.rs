//! Client-to-relay wire messages.
//!
//! - Publish: `["EVENT", <event object>]`
//! - Subscribe: `["REQ", <subscription id>, <filter object>]`

use serde_json::Value;

use relaygroups_core::{Clock, SignedEvent, EVENT_ENVELOPE};

use crate::error::Result;
use crate::filter::Filter;

/// Discriminator of the subscribe envelope.
pub const REQ_ENVELOPE: &str = "REQ";

/// Messages sent by clients, received by relays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Publish a signed event.
    Event(SignedEvent),

    /// Open a subscription.
    Req {
        subscription_id: String,
        filter: Filter,
    },
}

impl ClientMessage {
    pub fn req(subscription_id: impl Into<String>, filter: Filter) -> Self {
        ClientMessage::Req {
            subscription_id: subscription_id.into(),
            filter,
        }
    }

    /// The envelope as a JSON array.
    pub fn to_value(&self) -> Result<Value> {
        Ok(match self {
            Self::Event(event) => event.to_envelope()?,
            Self::Req {
                subscription_id,
                filter,
            } => Value::Array(vec![
                Value::String(REQ_ENVELOPE.to_string()),
                Value::String(subscription_id.clone()),
                serde_json::to_value(filter)?,
            ]),
        })
    }

    /// The envelope as compact JSON text.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    /// The carried event, for publish envelopes.
    pub fn event(&self) -> Option<&SignedEvent> {
        match self {
            Self::Event(event) => Some(event),
            Self::Req { .. } => None,
        }
    }

    /// The carried filter, for subscribe envelopes.
    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Req { filter, .. } => Some(filter),
            Self::Event(_) => None,
        }
    }

    pub fn subscription_id(&self) -> Option<&str> {
        match self {
            Self::Req {
                subscription_id, ..
            } => Some(subscription_id),
            Self::Event(_) => None,
        }
    }

    /// The envelope discriminator.
    pub fn discriminator(&self) -> &'static str {
        match self {
            Self::Event(_) => EVENT_ENVELOPE,
            Self::Req { .. } => REQ_ENVELOPE,
        }
    }
}

impl From<SignedEvent> for ClientMessage {
    fn from(event: SignedEvent) -> Self {
        ClientMessage::Event(event)
    }
}

/// Time-based subscription identifiers: `<prefix>-<unix millis>`.
///
/// Two calls within the same millisecond yield the same id. Callers opening
/// subscriptions in rapid succession should pass explicit ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionIdGenerator {
    prefix: String,
}

impl SubscriptionIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate an id from the clock's current time.
    pub fn generate(&self, clock: &dyn Clock) -> String {
        format!("{}-{}", self.prefix, clock.now_millis())
    }

    /// Use `explicit` if given, otherwise generate one.
    pub fn resolve(&self, explicit: Option<&str>, clock: &dyn Clock) -> String {
        match explicit {
            Some(id) => id.to_string(),
            None => self.generate(clock),
        }
    }
}
