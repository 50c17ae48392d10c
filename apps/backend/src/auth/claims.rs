//! Identity carried inside backend-issued access tokens.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

pub use crate::entities::users::Role;

/// Who a token is being issued for. The timestamps are added at signing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Claims included in our access tokens.
///
/// `sub` is the account id, rendered as a string on the wire as JWT expects.
/// The role recorded here is informational; the gate always re-reads the
/// account and authorizes against its current role.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
    #[serde_as(as = "DisplayFromStr")]
    pub sub: i64,
    pub email: String,
    pub role: Role,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl IdentityClaim {
    pub fn account_id(&self) -> i64 {
        self.sub
    }
}
