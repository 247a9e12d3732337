use actix_web::{HttpResponse, Result, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::auth::permissions::Permission;
use crate::database::models::{Role, UserUpdate};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Include inactive profiles; admin table only.
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RolesRequest {
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct AdminBootstrapRequest {
    pub email: String,
}

pub async fn list_users(
    state: web::Data<AppState>,
    user_context: UserContext,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    let users = if query.all {
        user_context.require(Permission::ManageUsers, None, None)?;
        state.users.list_all().await?
    } else {
        state.users.list().await
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn search_users(
    state: web::Data<AppState>,
    _user_context: UserContext,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let users = state.users.search(&query.q).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn users_by_role(
    state: web::Data<AppState>,
    _user_context: UserContext,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let role: Role = path
        .parse()
        .map_err(|_| AppError::bad_request(format!("Unknown role: {}", path)))?;

    let users = state.users.users_by_role(role).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(users)))
}

pub async fn get_user(
    state: web::Data<AppState>,
    _user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user = state
        .users
        .find(path.into_inner())
        .await
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn update_user(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
    update: web::Json<UserUpdate>,
) -> Result<HttpResponse> {
    let user = state
        .session
        .update_profile(&user_context.user, path.into_inner(), update.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn deactivate_user(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageUsers, None, None)?;
    let user_id = path.into_inner();
    forbid_self_deactivation(&user_context, user_id)?;

    state.users.deactivate_user(user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deactivated")))
}

pub async fn set_roles(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
    request: web::Json<RolesRequest>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageUsers, None, None)?;

    let user = state
        .users
        .set_roles(path.into_inner(), request.into_inner().roles)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

pub async fn set_active(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
    request: web::Json<ActiveRequest>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageUsers, None, None)?;
    let user_id = path.into_inner();
    if !request.is_active {
        forbid_self_deactivation(&user_context, user_id)?;
    }

    let user = state.users.set_active(user_id, request.is_active).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(user)))
}

/// Grants admin by e-mail. Open to any signed-in user while the club has no
/// active admin, afterwards only to user managers.
pub async fn admin_bootstrap(
    state: web::Data<AppState>,
    user_context: UserContext,
    request: web::Json<AdminBootstrapRequest>,
) -> Result<HttpResponse> {
    if state.users.has_active_admin().await? {
        user_context.require(Permission::ManageUsers, None, None)?;
    }

    let user = state.users.promote_to_admin(&request.email).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        user,
        "Admin role granted",
    )))
}

fn forbid_self_deactivation(user_context: &UserContext, user_id: Uuid) -> Result<(), AppError> {
    if user_id == user_context.user_id() {
        return Err(AppError::bad_request("You cannot deactivate yourself"));
    }
    Ok(())
}

pub async fn refresh_users(
    state: web::Data<AppState>,
    _user_context: UserContext,
) -> Result<HttpResponse> {
    state.users.refresh().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.users.list().await)))
}
