use actix_web::{HttpResponse, Result, web};
use serde_json::json;

use crate::AppState;
use crate::handlers::shared::ApiResponse;

pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(json!({
        "status": "ok",
        "mode": state.backend.mode(),
        "timestamp": chrono::Utc::now(),
    }))))
}
