//! Event verification: identity recomputation and signature check.
//!
//! Both checks must pass. An event whose stated id differs from the id of
//! its fields is rejected even if the signature verifies against the stated
//! id.

use tracing::warn;

use crate::error::ValidationError;
use crate::event::SignedEvent;

/// Validate an event, reporting the first failed check.
pub fn validate_event(event: &SignedEvent) -> Result<(), ValidationError> {
    // 1. Identity must match the stated fields
    let computed = event.recompute_id()?;
    if computed != *event.id() {
        return Err(ValidationError::IdMismatch {
            stated: *event.id(),
            computed,
        });
    }

    // 2. Signature over the identity under the stated pubkey
    if !event.pubkey().verify(event.id().as_bytes(), event.sig()) {
        return Err(ValidationError::SignatureFailed);
    }

    Ok(())
}

/// Verify an event. Any failure, including one computing the identity,
/// yields `false`.
pub fn verify_event(event: &SignedEvent) -> bool {
    match validate_event(event) {
        Ok(()) => true,
        Err(e) => {
            warn!(id = %event.id(), kind = event.kind(), error = %e, "event rejected");
            false
        }
    }
}
