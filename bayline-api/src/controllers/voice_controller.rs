use r2e::prelude::*;
use serde::Deserialize;

use crate::auth::identity::AuthIdentity;
use crate::envelope::Envelope;
use crate::voice::{self, Finding};

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseVoiceRequest {
    pub text: String,
}

#[derive(Controller)]
#[controller(path = "/api/voice", state = crate::state::AppState)]
pub struct VoiceController;

#[routes]
impl VoiceController {
    #[post("/parse")]
    async fn parse(
        &self,
        #[inject(identity)] _caller: AuthIdentity,
        Json(body): Json<ParseVoiceRequest>,
    ) -> Json<Envelope<Finding>> {
        Json(Envelope::ok(voice::parse(&body.text)))
    }
}
