use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{NewProfile, ProfileRow, Role, User, UserUpdate, roles_to_tags},
    utils::sql,
};

const PROFILE_COLUMNS: &str = r#"
    id,
    name,
    email,
    roles,
    teams,
    assigned_teams,
    parent_of,
    phone,
    date_of_birth,
    profile_image,
    is_active,
    created_at
"#;

/// Cheapest round trip to the remote store.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            SELECT {PROFILE_COLUMNS}
            FROM
                profiles
            WHERE
                id = ?
        "#
    )))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            SELECT {PROFILE_COLUMNS}
            FROM
                profiles
            WHERE
                email = ?
        "#
    )))
    .bind(email.to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

/// Newest active profiles first, bounded by `limit`.
pub async fn list_active(pool: &PgPool, limit: i64) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            SELECT {PROFILE_COLUMNS}
            FROM
                profiles
            WHERE
                is_active = TRUE
            ORDER BY
                created_at DESC
            LIMIT ?
        "#
    )))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(User::from).collect())
}

/// Every profile including deactivated ones, for the admin table.
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            SELECT {PROFILE_COLUMNS}
            FROM
                profiles
            ORDER BY
                created_at DESC
        "#
    )))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(User::from).collect())
}

pub async fn insert_profile(pool: &PgPool, profile: &NewProfile) -> Result<User, sqlx::Error> {
    let now = Utc::now();
    let row = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            INSERT INTO
                profiles (
                    id,
                    email,
                    name,
                    roles,
                    teams,
                    is_active,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, '{{}}', TRUE, ?, ?)
            RETURNING {PROFILE_COLUMNS}
        "#
    )))
    .bind(profile.id)
    .bind(&profile.email)
    .bind(&profile.name)
    .bind(roles_to_tags(&profile.roles))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Applies a partial update; absent fields keep their stored value.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    update: &UserUpdate,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            UPDATE
                profiles
            SET
                name = COALESCE(?, name),
                roles = COALESCE(?, roles),
                teams = COALESCE(?, teams),
                assigned_teams = COALESCE(?, assigned_teams),
                parent_of = COALESCE(?, parent_of),
                phone = COALESCE(?, phone),
                date_of_birth = COALESCE(?, date_of_birth),
                profile_image = COALESCE(?, profile_image),
                updated_at = ?
            WHERE
                id = ?
            RETURNING {PROFILE_COLUMNS}
        "#
    )))
    .bind(&update.name)
    .bind(update.roles.as_deref().map(roles_to_tags))
    .bind(&update.teams)
    .bind(&update.assigned_teams)
    .bind(&update.parent_of)
    .bind(&update.phone)
    .bind(update.date_of_birth)
    .bind(&update.profile_image)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

pub async fn set_active(
    pool: &PgPool,
    id: Uuid,
    is_active: bool,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, ProfileRow>(&sql(&format!(
        r#"
            UPDATE
                profiles
            SET
                is_active = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING {PROFILE_COLUMNS}
        "#
    )))
    .bind(is_active)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

/// Whether any active profile holds the admin role, regardless of paging.
pub async fn any_active_admin(pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(&sql(
        r#"
            SELECT EXISTS (
                SELECT 1
                FROM
                    profiles
                WHERE
                    is_active = TRUE
                    AND ? = ANY(roles)
            )
        "#,
    ))
    .bind(Role::Admin.as_str())
    .fetch_one(pool)
    .await
}
