use r2e::prelude::*;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::error::AppError;
use crate::models::user::{LoginRequest, RegisterRequest};
use crate::models::{Role, User, UserPublic};

const WEAK_PASSWORDS: &[&str] = &["password", "123456", "qwerty"];

/// Rejects passwords that fail the length/character/blacklist policy.
/// Does not hash anything — purely a pre-hash gate.
pub fn validate_password_policy(password: &str, email: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Invalid(
            "password must be at least 8 characters".into(),
        ));
    }
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AppError::Invalid(
            "password must contain at least one letter and one digit".into(),
        ));
    }
    let lower = password.to_lowercase();
    if WEAK_PASSWORDS.iter().any(|w| lower == *w) {
        return Err(AppError::Invalid("password is too common".into()));
    }
    let local_part = email.split('@').next().unwrap_or("").to_lowercase();
    if !local_part.is_empty() && lower.contains(&local_part) {
        return Err(AppError::Invalid(
            "password must not contain your email address".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub user: UserPublic,
    pub access: String,
    pub refresh: String,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    tokens: TokenService,
}

#[bean]
impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self { pool, tokens }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<UserPublic, AppError> {
        validate_password_policy(&req.password, &req.email)?;

        let exists: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM users WHERE lower(email) = lower($1)")
                .bind(&req.email)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_some() {
            return Err(AppError::AlreadyExists("email already registered".into()));
        }

        let password_hash = hash_password(&req.password)?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, true, now(), now()) \
             RETURNING id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(req.shop_id)
        .bind(req.email.to_lowercase())
        .bind(password_hash)
        .bind(req.full_name)
        .bind(req.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    /// Login deliberately returns the same `Unauthenticated` error for an
    /// unknown email and for a wrong password, and always runs a
    /// verification (against a throwaway hash when no user exists) so the
    /// two cases take comparable time.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResult, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at \
             FROM users WHERE lower(email) = lower($1)",
        )
        .bind(&req.email)
        .fetch_optional(&self.pool)
        .await?;

        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        let (user, hash) = match &user {
            Some(u) if u.is_active => (Some(u), u.password_hash.as_str()),
            _ => (None, dummy_hash),
        };

        let ok = verify_password(&req.password, hash).await?;
        let Some(user) = user.filter(|_| ok) else {
            return Err(AppError::Unauthenticated("invalid email or password".into()));
        };

        let access = self
            .tokens
            .mint_access(user.id, &user.email, user.role, user.shop_id);
        let (refresh, expires_at) = self.tokens.mint_refresh(user.id);

        sqlx::query(
            "INSERT INTO user_sessions (id, user_id, refresh_token, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, now())",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&refresh)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(LoginResult {
            user: user.clone().into(),
            access,
            refresh,
        })
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let mut tx = self.pool.begin().await?;

        let session: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM user_sessions \
             WHERE refresh_token = $1 AND user_id = $2 AND expires_at > now()",
        )
        .bind(refresh_token)
        .bind(claims.sub)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((user_id,)) = session else {
            return Err(AppError::Unauthenticated("refresh token not recognized".into()));
        };

        sqlx::query("DELETE FROM user_sessions WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let access = self
            .tokens
            .mint_access(user.id, &user.email, user.role, user.shop_id);
        let (new_refresh, expires_at) = self.tokens.mint_refresh(user.id);

        sqlx::query(
            "INSERT INTO user_sessions (id, user_id, refresh_token, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, now())",
        )
        .bind(Uuid::new_v4())
        .bind(user.id)
        .bind(&new_refresh)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(TokenPair {
            access,
            refresh: new_refresh,
        })
    }

    /// Best-effort: an unrecognized token is not an error.
    pub async fn logout(&self, refresh_token: &str) {
        let _ = sqlx::query("DELETE FROM user_sessions WHERE refresh_token = $1")
            .bind(refresh_token)
            .execute(&self.pool)
            .await;
    }

    pub async fn change_password(
        &self,
        user_id: Uuid,
        current: &str,
        new: &str,
    ) -> Result<(), AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))?;

        if !verify_password(current, &user.password_hash).await? {
            return Err(AppError::Unauthenticated("current password is incorrect".into()));
        }
        validate_password_policy(new, &user.email)?;

        let new_hash = hash_password(new)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = now() WHERE id = $2")
            .bind(new_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, shop_id, email, password_hash, full_name, role, is_active, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_passwords() {
        assert!(validate_password_policy("short1", "a@b.com").is_err());
    }

    #[test]
    fn rejects_letter_only_passwords() {
        assert!(validate_password_policy("allletters", "a@b.com").is_err());
    }

    #[test]
    fn rejects_common_passwords() {
        assert!(validate_password_policy("password", "a@b.com").is_err());
        assert!(validate_password_policy("12345678", "a@b.com").is_err());
    }

    #[test]
    fn rejects_password_containing_email_local_part() {
        assert!(validate_password_policy("johndoe123", "johndoe@example.com").is_err());
    }

    #[test]
    fn accepts_a_reasonable_password() {
        assert!(validate_password_policy("correcthorse9", "a@b.com").is_ok());
    }
}
