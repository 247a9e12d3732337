use actix_web::{HttpResponse, Result, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::permissions::has_permission;
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionQuery {
    pub action: String,
    pub target_user_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct PermissionAnswer {
    pub action: String,
    pub allowed: bool,
}

pub async fn check(
    user_context: UserContext,
    query: web::Query<PermissionQuery>,
) -> Result<HttpResponse> {
    let query = query.into_inner();
    let allowed = has_permission(
        Some(&user_context.user),
        &query.action,
        query.target_user_id,
        query.team_id,
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(PermissionAnswer {
        action: query.action,
        allowed,
    })))
}
