use std::collections::HashMap;

use r2e::prelude::*;
use serde::Deserialize;

use crate::auth::identity::AuthIdentity;
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::sms::{self, RenderedMessage};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PreviewSmsRequest {
    pub template: String,
    pub data: HashMap<String, String>,
}

#[derive(Controller)]
#[controller(path = "/api/sms", state = crate::state::AppState)]
pub struct SmsController;

#[routes]
impl SmsController {
    #[post("/preview")]
    async fn preview(
        &self,
        #[inject(identity)] _caller: AuthIdentity,
        Json(body): Json<PreviewSmsRequest>,
    ) -> Result<Json<Envelope<RenderedMessage>>, AppError> {
        let rendered = sms::render(&body.template, &body.data)?;
        Ok(Json(Envelope::ok(rendered)))
    }
}
