use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::user::Role;

pub const ISSUER: &str = "bayline-api";
pub const AUDIENCE: &str = "bayline-api-clients";

/// Payload of a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub shop_id: Uuid,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Payload of a long-lived refresh token. The string is also
/// persisted in `user_sessions` so it can be revoked server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }

    pub fn mint_access(&self, user_id: Uuid, email: &str, role: Role, shop_id: Uuid) -> String {
        let claims = AccessClaims {
            sub: user_id,
            email: email.to_string(),
            role,
            shop_id,
            exp: (Utc::now() + self.access_ttl).timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };
        encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("HS256 encoding never fails for well-formed claims")
    }

    /// Returns the signed refresh token string and its expiry instant.
    pub fn mint_refresh(&self, user_id: Uuid) -> (String, chrono::DateTime<Utc>) {
        let expires_at = Utc::now() + self.refresh_ttl;
        let claims = RefreshClaims {
            sub: user_id,
            exp: expires_at.timestamp(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
        };
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .expect("HS256 encoding never fails for well-formed claims");
        (token, expires_at)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.leeway = 60;
        let data = decode::<RefreshClaims>(token, &self.decoding_key(), &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Expired("refresh token expired".into())
                }
                _ => AppError::Unauthenticated("invalid refresh token".into()),
            },
        )?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret".to_vec(), Duration::minutes(15), Duration::days(7))
    }

    #[test]
    fn access_token_decodes_back_to_the_same_claims() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let shop_id = Uuid::new_v4();
        let token = svc.mint_access(user_id, "tech@example.com", Role::Mechanic, shop_id);

        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        let claims = decode::<AccessClaims>(&token, &svc.decoding_key(), &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.shop_id, shop_id);
        assert_eq!(claims.email, "tech@example.com");
    }

    #[test]
    fn refresh_token_round_trips_through_verify() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let (token, _expires_at) = svc.mint_refresh(user_id);
        let claims = svc.verify_refresh(&token).unwrap();
        assert_eq!(claims.sub, user_id);
    }

    #[test]
    fn refresh_token_signed_with_a_different_secret_is_rejected() {
        let svc = service();
        let other = TokenService::new(b"other-secret".to_vec(), Duration::minutes(15), Duration::days(7));
        let (token, _) = other.mint_refresh(Uuid::new_v4());
        assert!(svc.verify_refresh(&token).is_err());
    }

    #[test]
    fn expired_refresh_token_reports_expired() {
        let svc = TokenService::new(b"test-secret".to_vec(), Duration::minutes(15), Duration::seconds(-1));
        let (token, _) = svc.mint_refresh(Uuid::new_v4());
        match svc.verify_refresh(&token) {
            Err(AppError::Expired(_)) => {}
            other => panic!("expected Expired, got {other:?}"),
        }
    }
}
