use r2e::r2e_security::{impl_claims_identity_extractor, ClaimsIdentity};
use r2e::{Identity, HttpError};
use uuid::Uuid;

use crate::models::user::Role;
use crate::state::AppState;

/// Identity attached to every request carrying a valid access token.
///
/// Built directly from our own access-token claims (`user_id`, `email`,
/// `role`, `shop_id`) — no database round trip needed, since those are
/// exactly the fields minted into the access token in the first place.
#[derive(Clone, Debug)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub roles: Vec<String>,
    pub shop_id: Uuid,
}

impl AuthIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Enforces shop-scoped tenancy: admins bypass the check.
    pub fn can_access_shop(&self, shop_id: Uuid) -> bool {
        self.is_admin() || self.shop_id == shop_id
    }
}

impl ClaimsIdentity<AppState> for AuthIdentity {
    async fn from_jwt_claims(
        claims: serde_json::Value,
        _state: &AppState,
    ) -> Result<Self, HttpError> {
        let user_id = claims
            .get("sub")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| HttpError::Unauthorized("malformed token subject".into()))?;
        let email = claims
            .get("email")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HttpError::Unauthorized("missing email claim".into()))?
            .to_string();
        let role = claims
            .get("role")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse::<Role>().ok())
            .ok_or_else(|| HttpError::Unauthorized("missing or invalid role claim".into()))?;
        let shop_id = claims
            .get("shop_id")
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| HttpError::Unauthorized("missing shop_id claim".into()))?;

        Ok(AuthIdentity {
            user_id,
            sub: user_id.to_string(),
            email,
            role,
            roles: vec![role.as_str().to_string()],
            shop_id,
        })
    }
}

impl_claims_identity_extractor!(AuthIdentity);

impl Identity for AuthIdentity {
    fn sub(&self) -> &str {
        &self.sub
    }

    fn roles(&self) -> &[String] {
        &self.roles
    }

    fn email(&self) -> Option<&str> {
        Some(&self.email)
    }
}

impl r2e::r2e_security::RoleBasedIdentity for AuthIdentity {
    fn roles(&self) -> &[String] {
        &self.roles
    }
}
