use chrono::{DateTime, Utc};
use garde::Validate;
use r2e::r2e_data::Entity;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, JsonSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    ShopManager,
    Mechanic,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ShopManager => "shop_manager",
            Role::Mechanic => "mechanic",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "shop_manager" => Ok(Role::ShopManager),
            "mechanic" => Ok(Role::Mechanic),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = Uuid;

    fn table_name() -> &'static str {
        "users"
    }

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "shop_id",
            "email",
            "password_hash",
            "full_name",
            "role",
            "is_active",
            "created_at",
            "updated_at",
        ]
    }

    fn id(&self) -> &Uuid {
        &self.id
    }
}

/// Public projection of a user — never carries `password_hash`.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UserPublic {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
}

impl From<User> for UserPublic {
    fn from(u: User) -> Self {
        UserPublic {
            id: u.id,
            shop_id: u.shop_id,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RegisterRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 8))]
    pub password: String,
    #[garde(length(min = 1, max = 200))]
    pub full_name: String,
    #[garde(skip)]
    pub role: Role,
    #[garde(skip)]
    pub shop_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RefreshRequest {
    #[garde(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ChangePasswordRequest {
    #[garde(length(min = 1))]
    pub current: String,
    #[garde(length(min = 8))]
    pub new: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_as_str_and_from_str() {
        for role in [Role::Admin, Role::ShopManager, Role::Mechanic] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn unknown_role_string_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let req = RegisterRequest {
            email: "tech@example.com".into(),
            password: "short".into(),
            full_name: "A Technician".into(),
            role: Role::Mechanic,
            shop_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_rejects_malformed_email() {
        let req = RegisterRequest {
            email: "not-an-email".into(),
            password: "long-enough-password".into(),
            full_name: "A Technician".into(),
            role: Role::Mechanic,
            shop_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let req = RegisterRequest {
            email: "tech@example.com".into(),
            password: "long-enough-password".into(),
            full_name: "A Technician".into(),
            role: Role::Mechanic,
            shop_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_ok());
    }
}
