use r2e::prelude::*;
use serde::Serialize;

use crate::envelope::Envelope;
use crate::state::AppState;

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct DatabaseHealth {
    connected: bool,
    time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
struct HealthBody {
    status: String,
    database: DatabaseHealth,
    services: std::collections::BTreeMap<String, bool>,
}

#[derive(Controller)]
#[controller(path = "/api", state = AppState)]
pub struct HealthController;

#[routes]
impl HealthController {
    /// Never requires auth — a liveness/readiness probe for callers
    /// that can't present a token yet.
    #[get("/health")]
    async fn health(&self, State(state): State<AppState>) -> Json<Envelope<HealthBody>> {
        let row: Result<(chrono::DateTime<chrono::Utc>,), _> =
            sqlx::query_as("SELECT now()").fetch_one(&state.pool).await;

        let database = match row {
            Ok((time,)) => DatabaseHealth {
                connected: true,
                time: Some(time),
            },
            Err(_) => DatabaseHealth {
                connected: false,
                time: None,
            },
        };

        let mut services = std::collections::BTreeMap::new();
        services.insert("sms".to_string(), state.app_config.enable_sms);

        Json(Envelope::ok(HealthBody {
            status: if database.connected { "ok".into() } else { "degraded".into() },
            database,
            services,
        }))
    }
}
