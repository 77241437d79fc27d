use std::sync::Arc;

use r2e::prelude::*;
use r2e::r2e_data_sqlx::HasPool;
use r2e::r2e_security::{JwtClaimsValidator, SecurityConfig};
use sqlx::{Pool, Postgres};

use crate::auth::service::AuthService;
use crate::auth::token::TokenService;
use crate::config::AppConfig;
use crate::inspections::service::InspectionService;
use crate::portal::service::PortalService;

#[derive(Clone, BeanState)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub config: R2eConfig,
    pub app_config: AppConfig,
    pub tokens: TokenService,
    pub claims_validator: Arc<JwtClaimsValidator>,
    pub auth_service: AuthService,
    pub inspection_service: InspectionService,
    pub portal_service: PortalService,
}

impl HasPool<Postgres> for AppState {
    fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

impl FromRef<AppState> for Arc<JwtClaimsValidator> {
    fn from_ref(state: &AppState) -> Self {
        state.claims_validator.clone()
    }
}

/// Builds the static-key validator our own self-issued access tokens are
/// checked against — HS256 only, no JWKS endpoint involved.
pub fn build_claims_validator(tokens: &TokenService) -> Arc<JwtClaimsValidator> {
    let security_config = SecurityConfig::new("", crate::auth::token::ISSUER, crate::auth::token::AUDIENCE)
        .with_allowed_algorithm(jsonwebtoken::Algorithm::HS256);
    Arc::new(JwtClaimsValidator::new_with_static_key(
        tokens.decoding_key(),
        security_config,
    ))
}
