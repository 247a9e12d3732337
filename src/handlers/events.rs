use actix_web::{HttpResponse, Result, web};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::AppState;
use crate::auth::permissions::Permission;
use crate::database::models::{EventInput, EventUpdate};
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

pub async fn list_events(
    state: web::Data<AppState>,
    _user_context: UserContext,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.events.list().await)))
}

pub async fn upcoming_events(
    state: web::Data<AppState>,
    _user_context: UserContext,
) -> Result<HttpResponse> {
    let today = Utc::now().date_naive();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        state.events.upcoming(today).await,
    )))
}

pub async fn events_on_day(
    state: web::Data<AppState>,
    _user_context: UserContext,
    path: web::Path<NaiveDate>,
) -> Result<HttpResponse> {
    let events = state.events.on_day(path.into_inner()).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(events)))
}

pub async fn personal_events(
    state: web::Data<AppState>,
    user_context: UserContext,
) -> Result<HttpResponse> {
    let events = state.events.personal(&user_context.user).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(events)))
}

pub async fn get_event(
    state: web::Data<AppState>,
    _user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let event = state.events.find(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(event)))
}

pub async fn create_event(
    state: web::Data<AppState>,
    user_context: UserContext,
    input: web::Json<EventInput>,
) -> Result<HttpResponse> {
    user_context.require(Permission::CreateEvent, None, input.team_id)?;

    let event = state
        .events
        .create(input.into_inner(), user_context.user_id())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(event)))
}

pub async fn update_event(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
    update: web::Json<EventUpdate>,
) -> Result<HttpResponse> {
    user_context.require(Permission::EditEvent, None, update.team_id)?;

    let event = state.events.update(path.into_inner(), &update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(event)))
}

pub async fn delete_event(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    user_context.require(Permission::DeleteEvent, None, None)?;

    state.events.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Event deleted")))
}

pub async fn join_event(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    user_context.require(Permission::JoinEvent, None, None)?;

    let event = state
        .events
        .join(path.into_inner(), user_context.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(event)))
}

pub async fn leave_event(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let event = state
        .events
        .leave(path.into_inner(), user_context.user_id())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(event)))
}
