use chrono::{DateTime, Utc};
use r2e::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::identity::AuthIdentity;
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::portal::projection::PortalProjection;
use crate::portal::service::PortalService;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GeneratePortalRequest {
    pub inspection_id: Uuid,
}

#[derive(Debug, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePortalResponse {
    pub token: String,
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Controller)]
#[controller(path = "/api/portal", state = crate::state::AppState)]
pub struct PortalController {
    #[inject]
    portal: PortalService,
}

#[routes]
impl PortalController {
    #[post("/generate")]
    async fn generate(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Json(body): Json<GeneratePortalRequest>,
    ) -> Result<Json<Envelope<GeneratePortalResponse>>, AppError> {
        let (token, expires_at) = self.portal.mint(&caller, body.inspection_id).await?;
        let url = format!("/api/portal/{token}");
        Ok(Json(Envelope::ok(GeneratePortalResponse {
            token,
            url,
            expires_at,
        })))
    }

    #[get("/{token}")]
    async fn read(&self, Path(token): Path<String>) -> Result<Json<Envelope<PortalProjection>>, AppError> {
        let projection = self.portal.verify_and_read(&token).await?;
        Ok(Json(Envelope::ok(projection)))
    }
}
