use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Event, EventRow, EventUpdate},
    utils::sql,
};

const EVENT_COLUMNS: &str = r#"
    id,
    title,
    date,
    type,
    time,
    location,
    venue_type,
    opponent,
    description,
    max_participants,
    participants,
    created_by,
    requires_approval,
    team_id,
    created_at
"#;

/// Latest `limit` events by date, newest first.
pub async fn list_events(pool: &PgPool, limit: i64) -> Result<Vec<Event>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EventRow>(&sql(&format!(
        r#"
            SELECT {EVENT_COLUMNS}
            FROM
                events
            ORDER BY
                date DESC
            LIMIT ?
        "#
    )))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Event::from).collect())
}

pub async fn create_event(pool: &PgPool, event: &Event) -> Result<Event, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, EventRow>(&sql(&format!(
        r#"
            INSERT INTO
                events (
                    id,
                    title,
                    date,
                    type,
                    time,
                    location,
                    venue_type,
                    opponent,
                    description,
                    max_participants,
                    participants,
                    created_by,
                    requires_approval,
                    team_id,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {EVENT_COLUMNS}
        "#
    )))
    .bind(event.id)
    .bind(&event.title)
    .bind(event.date)
    .bind(event.event_type)
    .bind(&event.time)
    .bind(&event.location)
    .bind(event.venue_type)
    .bind(&event.opponent)
    .bind(&event.description)
    .bind(event.max_participants)
    .bind(&event.participants)
    .bind(event.created_by)
    .bind(event.requires_approval)
    .bind(event.team_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub async fn update_event(
    pool: &PgPool,
    id: Uuid,
    update: &EventUpdate,
) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>(&sql(&format!(
        r#"
            UPDATE
                events
            SET
                title = COALESCE(?, title),
                date = COALESCE(?, date),
                type = COALESCE(?, type),
                time = COALESCE(?, time),
                location = COALESCE(?, location),
                venue_type = COALESCE(?, venue_type),
                opponent = COALESCE(?, opponent),
                description = COALESCE(?, description),
                max_participants = COALESCE(?, max_participants),
                requires_approval = COALESCE(?, requires_approval),
                team_id = COALESCE(?, team_id),
                updated_at = ?
            WHERE
                id = ?
            RETURNING {EVENT_COLUMNS}
        "#
    )))
    .bind(&update.title)
    .bind(update.date)
    .bind(update.event_type)
    .bind(&update.time)
    .bind(&update.location)
    .bind(update.venue_type)
    .bind(&update.opponent)
    .bind(&update.description)
    .bind(update.max_participants)
    .bind(update.requires_approval)
    .bind(update.team_id)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Event::from))
}

pub async fn set_participants(
    pool: &PgPool,
    id: Uuid,
    participants: &[Uuid],
) -> Result<Option<Event>, sqlx::Error> {
    let row = sqlx::query_as::<_, EventRow>(&sql(&format!(
        r#"
            UPDATE
                events
            SET
                participants = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING {EVENT_COLUMNS}
        "#
    )))
    .bind(participants)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Event::from))
}

pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM events WHERE id = ?"))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
