use actix_web::{Error as ActixError, FromRequest, HttpRequest, dev::Payload, web::Data};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::AppState;
use crate::auth::{
    Claims,
    permissions::{Permission, allows},
};
use crate::database::models::User;
use crate::error::AppError;

/// The signed-in caller, resolved from the bearer token to a profile.
///
/// Injected into handlers through `FromRequest`. Online the profile is read
/// from the remote store, offline from the user mirror.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user: User,
    pub claims: Claims,
}

impl UserContext {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// Fails with `PermissionDenied` unless the permission table grants `permission`.
    pub fn require(
        &self,
        permission: Permission,
        target_user_id: Option<Uuid>,
        team_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if allows(Some(&self.user), permission, target_user_id, team_id) {
            Ok(())
        } else {
            log::debug!("User {} denied {}", self.user.id, permission);
            Err(AppError::PermissionDenied(format!(
                "Missing permission: {}",
                permission
            )))
        }
    }
}

impl FromRequest for UserContext {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let claims = Claims::from_request(req, payload).into_inner();
        let state = req.app_data::<Data<AppState>>().cloned();

        Box::pin(async move {
            let claims = claims?;
            let state = state.ok_or_else(|| {
                log::error!("AppState missing from app data");
                AppError::internal_server_error()
            })?;

            let user = state
                .users
                .profile(claims.user_id())
                .await?
                .ok_or(AppError::Unauthorized)?;

            Ok::<_, ActixError>(UserContext { user, claims })
        })
    }
}
