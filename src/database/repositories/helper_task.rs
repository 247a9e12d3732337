use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{HelperTask, HelperTaskRow},
    utils::sql,
};

const TASK_COLUMNS: &str = r#"
    id,
    event_id,
    task,
    status,
    assigned_to,
    assigned_date,
    completed_date,
    created_by,
    description,
    priority
"#;

pub async fn list_tasks(pool: &PgPool, limit: i64) -> Result<Vec<HelperTask>, sqlx::Error> {
    let rows = sqlx::query_as::<_, HelperTaskRow>(&sql(&format!(
        r#"
            SELECT {TASK_COLUMNS}
            FROM
                helper_tasks
            ORDER BY
                assigned_date DESC
            LIMIT ?
        "#
    )))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(HelperTask::from).collect())
}

pub async fn create_task(pool: &PgPool, task: &HelperTask) -> Result<HelperTask, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, HelperTaskRow>(&sql(&format!(
        r#"
            INSERT INTO
                helper_tasks (
                    id,
                    event_id,
                    task,
                    status,
                    assigned_to,
                    assigned_date,
                    completed_date,
                    created_by,
                    description,
                    priority,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TASK_COLUMNS}
        "#
    )))
    .bind(task.id)
    .bind(task.event_id)
    .bind(&task.task)
    .bind(task.status)
    .bind(task.assigned_to)
    .bind(task.assigned_date)
    .bind(task.completed_date)
    .bind(task.created_by)
    .bind(&task.description)
    .bind(task.priority)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Writes the full mutable state of a task; the caller has already merged the patch.
pub async fn save_task(pool: &PgPool, task: &HelperTask) -> Result<Option<HelperTask>, sqlx::Error> {
    let row = sqlx::query_as::<_, HelperTaskRow>(&sql(&format!(
        r#"
            UPDATE
                helper_tasks
            SET
                event_id = ?,
                task = ?,
                status = ?,
                assigned_to = ?,
                completed_date = ?,
                description = ?,
                priority = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING {TASK_COLUMNS}
        "#
    )))
    .bind(task.event_id)
    .bind(&task.task)
    .bind(task.status)
    .bind(task.assigned_to)
    .bind(task.completed_date)
    .bind(&task.description)
    .bind(task.priority)
    .bind(Utc::now())
    .bind(task.id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(HelperTask::from))
}

pub async fn delete_task(pool: &PgPool, id: Uuid) -> Result<Option<()>, sqlx::Error> {
    let result = sqlx::query(&sql("DELETE FROM helper_tasks WHERE id = ?"))
        .bind(id)
        .execute(pool)
        .await?;

    Ok(if result.rows_affected() > 0 {
        Some(())
    } else {
        None
    })
}
