use actix_web::{HttpRequest, HttpResponse, Result, web};
use serde_json::json;

use crate::AppState;
use crate::auth::bearer_token;
use crate::database::models::UserUpdate;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::{
    UserContext,
    session::{Credentials, SignUpRequest},
};

pub async fn sign_in(
    state: web::Data<AppState>,
    credentials: web::Json<Credentials>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    log::debug!(
        "Sign-in attempt for {} (correlation_id={})",
        credentials.email,
        req.correlation_id().unwrap_or_default()
    );

    let response = state.session.sign_in(&credentials).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn sign_up(
    state: web::Data<AppState>,
    request: web::Json<SignUpRequest>,
) -> Result<HttpResponse> {
    let response = state.session.sign_up(&request).await?;
    let message = if response.confirmation_required {
        "Please confirm your email address"
    } else {
        "Account created"
    };

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(response, message)))
}

pub async fn sign_out(
    state: web::Data<AppState>,
    user_context: UserContext,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let token = bearer_token(&req).unwrap_or_default();
    state.session.sign_out(user_context.user_id(), token).await;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Signed out")))
}

pub async fn session(
    state: web::Data<AppState>,
    user_context: UserContext,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let token = bearer_token(&req).unwrap_or_default();
    let session = state.session.session(user_context.user, token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(session)))
}

pub async fn oauth(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let url = state.session.oauth_url(&path.into_inner())?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({ "url": url }))))
}

pub async fn update_profile(
    state: web::Data<AppState>,
    user_context: UserContext,
    update: web::Json<UserUpdate>,
) -> Result<HttpResponse> {
    let user = state
        .session
        .update_profile(&user_context.user, user_context.user_id(), update.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(user, "Profile updated")))
}
