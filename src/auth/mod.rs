//! Authentication and authorization module

pub mod credentials;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

pub use credentials::CredentialVerifier;
pub use guard::{ensure_owner, protect, require_role, OwnedResource, Protection, ResourceKind};
pub use middleware::{extract_token, jwt_auth_middleware, AuthContext};
pub use password::{PasswordHasher, PasswordMatch};
pub use token::{Claims, Identity, TokenService, Verification, VerifiedClaims};
