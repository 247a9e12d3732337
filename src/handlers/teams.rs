use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::AppState;
use crate::auth::permissions::Permission;
use crate::database::models::{MemberKind, TeamInput, TeamUpdate};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::UserContext;

fn member_kind(column: &str) -> Result<MemberKind, AppError> {
    MemberKind::from_column(column)
        .ok_or_else(|| AppError::not_found(format!("Unknown roster list: {}", column)))
}

pub async fn list_teams(
    state: web::Data<AppState>,
    _user_context: UserContext,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.teams.list().await)))
}

pub async fn my_teams(
    state: web::Data<AppState>,
    user_context: UserContext,
) -> Result<HttpResponse> {
    let teams = state.teams.teams_for_user(&user_context.user).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(teams)))
}

pub async fn get_team(
    state: web::Data<AppState>,
    _user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let team = state.teams.find(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}

pub async fn create_team(
    state: web::Data<AppState>,
    user_context: UserContext,
    input: web::Json<TeamInput>,
) -> Result<HttpResponse> {
    user_context.require(Permission::ManageTeams, None, None)?;

    let team = state.teams.create(input.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(team)))
}

pub async fn update_team(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
    update: web::Json<TeamUpdate>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    user_context.require(Permission::ManageTeams, None, Some(team_id))?;

    let team = state.teams.update(team_id, &update).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}

pub async fn delete_team(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();
    user_context.require(Permission::ManageTeams, None, Some(team_id))?;

    state.teams.delete(team_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Team deleted")))
}

/// Roster list (`players` or `trainers`) resolved to user records.
pub async fn list_members(
    state: web::Data<AppState>,
    _user_context: UserContext,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse> {
    let (team_id, column) = path.into_inner();
    let kind = member_kind(&column)?;

    let users = state.users.list().await;
    let members = state.teams.members(team_id, kind, &users).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(members)))
}

pub async fn add_member(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<(Uuid, String, Uuid)>,
) -> Result<HttpResponse> {
    let (team_id, column, user_id) = path.into_inner();
    let kind = member_kind(&column)?;
    user_context.require(Permission::ManageTeams, None, Some(team_id))?;

    let team = state.teams.add_member(team_id, kind, user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}

pub async fn remove_member(
    state: web::Data<AppState>,
    user_context: UserContext,
    path: web::Path<(Uuid, String, Uuid)>,
) -> Result<HttpResponse> {
    let (team_id, column, user_id) = path.into_inner();
    let kind = member_kind(&column)?;
    user_context.require(Permission::ManageTeams, None, Some(team_id))?;

    let team = state.teams.remove_member(team_id, kind, user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
}
