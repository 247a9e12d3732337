use std::time::Duration;

use anyhow::Result;
use sqlx::{PgPool, postgres::PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod utils;

/// Builds the pool for the hosted Postgres without opening a connection.
///
/// The first query connects; start-up reachability is decided by the
/// session bootstrap, not here.
pub fn init_pool(database_url: &str, acquire_timeout: Duration) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(acquire_timeout)
        .connect_lazy(database_url)?;

    log::info!("Database pool configured");
    Ok(pool)
}
