use garde::Validate;
use r2e::prelude::*;

use crate::auth::identity::AuthIdentity;
use crate::auth::service::AuthService;
use crate::envelope::Envelope;
use crate::error::AppError;
use crate::models::user::{ChangePasswordRequest, LoginRequest, RefreshRequest, RegisterRequest};
use crate::models::UserPublic;
use crate::state::AppState;

#[derive(Controller)]
#[controller(path = "/api/auth", state = AppState)]
pub struct AuthController {
    #[inject]
    auth_service: AuthService,
}

#[routes]
impl AuthController {
    #[post("/register")]
    async fn register(
        &self,
        Json(body): Json<RegisterRequest>,
    ) -> Result<Json<Envelope<UserPublic>>, AppError> {
        body.validate().map_err(|e| AppError::Invalid(e.to_string()))?;
        let user = self.auth_service.register(body).await?;
        Ok(Json(Envelope::ok(user)))
    }

    #[post("/login")]
    async fn login(
        &self,
        Json(body): Json<LoginRequest>,
    ) -> Result<Json<Envelope<crate::auth::service::LoginResult>>, AppError> {
        body.validate().map_err(|e| AppError::Invalid(e.to_string()))?;
        let result = self.auth_service.login(body).await?;
        Ok(Json(Envelope::ok(result)))
    }

    #[post("/refresh")]
    async fn refresh(
        &self,
        Json(body): Json<RefreshRequest>,
    ) -> Result<Json<Envelope<crate::auth::service::TokenPair>>, AppError> {
        body.validate().map_err(|e| AppError::Invalid(e.to_string()))?;
        let pair = self.auth_service.refresh(&body.refresh_token).await?;
        Ok(Json(Envelope::ok(pair)))
    }

    #[post("/logout")]
    async fn logout(
        &self,
        Json(body): Json<RefreshRequest>,
    ) -> Json<Envelope<bool>> {
        self.auth_service.logout(&body.refresh_token).await;
        Json(Envelope::ok(true))
    }

    #[get("/me")]
    async fn me(
        &self,
        #[inject(identity)] caller: AuthIdentity,
    ) -> Result<Json<Envelope<UserPublic>>, AppError> {
        let user = self.auth_service.find_user(caller.user_id).await?;
        Ok(Json(Envelope::ok(user.into())))
    }

    #[post("/change-password")]
    async fn change_password(
        &self,
        #[inject(identity)] caller: AuthIdentity,
        Json(body): Json<ChangePasswordRequest>,
    ) -> Result<Json<Envelope<bool>>, AppError> {
        body.validate().map_err(|e| AppError::Invalid(e.to_string()))?;
        self.auth_service
            .change_password(caller.user_id, &body.current, &body.new)
            .await?;
        Ok(Json(Envelope::ok(true)))
    }
}
