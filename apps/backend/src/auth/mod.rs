pub mod claims;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod permissions;

pub use claims::{IdentityClaim, Role, TokenSubject};
pub use gate::{authorize, AuthenticatedUser};
pub use jwt::{issue_token, verify_token, InvalidToken};
pub use permissions::{Permission, RoutePermission};
