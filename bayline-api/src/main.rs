use std::sync::Arc;

use r2e::prelude::*;
use r2e::r2e_security::JwtClaimsValidator;

use bayline_api::auth::{AuthService, TokenService};
use bayline_api::config::{parse_duration, AppConfig};
use bayline_api::controllers::auth_controller::AuthController;
use bayline_api::controllers::health_controller::HealthController;
use bayline_api::controllers::inspection_controller::InspectionController;
use bayline_api::controllers::portal_controller::PortalController;
use bayline_api::controllers::sms_controller::SmsController;
use bayline_api::controllers::voice_controller::VoiceController;
use bayline_api::inspections::InspectionService;
use bayline_api::portal::{PortalService, PortalTokenService};
use bayline_api::state::{build_claims_validator, AppState};

#[producer]
async fn create_pool(app_config: AppConfig) -> sqlx::PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(app_config.database_max_connections as u32)
        .connect(&app_config.database_url)
        .await
        .expect("failed to connect to PostgreSQL")
}

#[producer]
fn create_token_service(app_config: AppConfig) -> TokenService {
    let access_ttl = parse_duration(&app_config.jwt_access_ttl, chrono::Duration::minutes(15));
    let refresh_ttl = parse_duration(&app_config.jwt_refresh_ttl, chrono::Duration::days(7));
    TokenService::new(app_config.jwt_secret.into_bytes(), access_ttl, refresh_ttl)
}

#[producer]
fn create_portal_token_service(app_config: AppConfig) -> PortalTokenService {
    PortalTokenService::new(app_config.jwt_secret.into_bytes())
}

#[producer]
fn create_claims_validator(tokens: TokenService) -> Arc<JwtClaimsValidator> {
    build_claims_validator(&tokens)
}

#[tokio::main]
async fn main() {
    r2e::init_tracing();

    let config = R2eConfig::load("bayline").unwrap_or_else(|_| R2eConfig::empty());
    let app_config = AppConfig::from_config(&config).expect("invalid configuration — check required environment variables");

    AppBuilder::new()
        .provide(config.clone())
        .provide(app_config.clone())
        .with_producer::<CreatePool>()
        .with_producer::<CreateTokenService>()
        .with_producer::<CreatePortalTokenService>()
        .with_producer::<CreateClaimsValidator>()
        .with_bean::<AuthService>()
        .with_bean::<InspectionService>()
        .with_bean::<PortalService>()
        .build_state::<AppState, _>()
        .await
        .with_config(config)
        .with(Health)
        .with(Cors::permissive())
        .with(Tracing)
        .with(ErrorHandling)
        .on_start(|state| async move {
            sqlx::migrate!("./migrations")
                .run(&state.pool)
                .await
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
            tracing::info!("database migrations applied");
            Ok(())
        })
        .register_controller::<HealthController>()
        .register_controller::<AuthController>()
        .register_controller::<InspectionController>()
        .register_controller::<VoiceController>()
        .register_controller::<SmsController>()
        .register_controller::<PortalController>()
        .serve(format!("0.0.0.0:{}", app_config.port))
        .await
        .unwrap();
}
