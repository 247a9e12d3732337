use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::AppState;
use crate::auth::permissions::Permission;
use crate::database::models::{HelperTaskInput, HelperTaskUpdate};
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

pub async fn list_tasks(
    state: web::Data<AppState>,
    _user_context: UserContext,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.helper_tasks.list().await)))
}

pub async fn task_stats(
    state: web::Data<AppState>,
    _user_context: UserContext,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.helper_tasks.stats().await)))
}

pub async fn create_task(
    state: web::Data<AppState>,
    user_context: UserContext,
    input: web::Json<HelperTaskInput>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageHelperTasks, None, None)?;

    let task = state
        .helper_tasks
        .create(input.into_inner(), user_context.user_id())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(task)))
}

pub async fn update_task(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
    update: web::Json<HelperTaskUpdate>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageHelperTasks, None, None)?;

    let task = state.helper_tasks.update(path.into_inner(), &update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

pub async fn delete_task(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageHelperTasks, None, None)?;

    state.helper_tasks.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Helper task deleted")))
}

/// Task managers and the assigned helper may mark a task done.
pub async fn complete_task(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let task_id = path.into_inner();
    let task = state.helper_tasks.find(task_id).await?;
    if task.assigned_to != Some(user_context.user_id()) {
        user_context.require(Permission::ManageHelperTasks, None, None)?;
    }

    let task = state.helper_tasks.complete(task_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

pub async fn mark_no_show(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageHelperTasks, None, None)?;

    let task = state.helper_tasks.mark_no_show(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}

pub async fn reopen_task(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageHelperTasks, None, None)?;

    let task = state.helper_tasks.reopen(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(task)))
}
