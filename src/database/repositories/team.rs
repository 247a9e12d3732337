use chrono::Utc;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::database::{
    models::{MemberKind, Team, TeamRow, TeamUpdate},
    utils::sql,
};

const TEAM_COLUMNS: &str = r#"
    id,
    name,
    category,
    gender,
    season,
    trainers,
    players,
    captain,
    description,
    training_times,
    is_active,
    created_at
"#;

pub async fn list_active(pool: &PgPool) -> Result<Vec<Team>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TeamRow>(&sql(&format!(
        r#"
            SELECT {TEAM_COLUMNS}
            FROM
                teams
            WHERE
                is_active = TRUE
            ORDER BY
                name
        "#
    )))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Team::from).collect())
}

pub async fn create_team(pool: &PgPool, team: &Team) -> Result<Team, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, TeamRow>(&sql(&format!(
        r#"
            INSERT INTO
                teams (
                    id,
                    name,
                    category,
                    gender,
                    season,
                    trainers,
                    players,
                    captain,
                    description,
                    training_times,
                    is_active,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TEAM_COLUMNS}
        "#
    )))
    .bind(team.id)
    .bind(&team.name)
    .bind(team.category)
    .bind(team.gender)
    .bind(&team.season)
    .bind(&team.trainers)
    .bind(&team.players)
    .bind(team.captain)
    .bind(&team.description)
    .bind(Json(&team.training_times))
    .bind(team.is_active)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub async fn update_team(
    pool: &PgPool,
    id: Uuid,
    update: &TeamUpdate,
) -> Result<Option<Team>, sqlx::Error> {
    let row = sqlx::query_as::<_, TeamRow>(&sql(&format!(
        r#"
            UPDATE
                teams
            SET
                name = COALESCE(?, name),
                category = COALESCE(?, category),
                gender = COALESCE(?, gender),
                season = COALESCE(?, season),
                captain = COALESCE(?, captain),
                description = COALESCE(?, description),
                training_times = COALESCE(?, training_times),
                updated_at = ?
            WHERE
                id = ?
            RETURNING {TEAM_COLUMNS}
        "#
    )))
    .bind(&update.name)
    .bind(update.category)
    .bind(update.gender)
    .bind(&update.season)
    .bind(update.captain)
    .bind(&update.description)
    .bind(update.training_times.as_ref().map(Json))
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Team::from))
}

/// Replaces one roster list (players or trainers) of a team.
pub async fn set_members(
    pool: &PgPool,
    id: Uuid,
    kind: MemberKind,
    members: &[Uuid],
) -> Result<Option<Team>, sqlx::Error> {
    let column = kind.column();
    let row = sqlx::query_as::<_, TeamRow>(&sql(&format!(
        r#"
            UPDATE
                teams
            SET
                {column} = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING {TEAM_COLUMNS}
        "#
    )))
    .bind(members)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Team::from))
}

/// Soft delete: the row stays, flagged inactive.
pub async fn deactivate_team(pool: &PgPool, id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql(r#"
            UPDATE
                teams
            SET
                is_active = FALSE,
                updated_at = ?
            WHERE
                id = ?
        "#))
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
