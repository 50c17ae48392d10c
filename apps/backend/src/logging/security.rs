//! Security events, logged with a stable `event` field so they can be
//! filtered out of the JSON stream.

use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// The gate turned a request away. `reason` is internal detail only.
pub fn access_denied(status: u16, reason: &str, user_id: Option<i64>) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ACCESS_DENIED",
        %trace_id,
        status,
        reason,
        user_id,
        "Request rejected by auth gate"
    );
}
