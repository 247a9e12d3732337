pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use error::AppError;

use auth::supabase::SupabaseAuth;
use services::{Backend, EventBoard, HelperTaskBoard, SessionService, TeamRoster, UserDirectory};

/// Everything the handlers share. Cheap to clone; the mirrors behind it are
/// reference counted.
#[derive(Clone)]
pub struct AppState {
    pub backend: Backend,
    pub users: UserDirectory,
    pub teams: TeamRoster,
    pub events: EventBoard,
    pub helper_tasks: HelperTaskBoard,
    pub session: SessionService,
}

impl AppState {
    pub fn new(config: &Config, backend: Backend) -> Result<Self, AppError> {
        let auth = SupabaseAuth::new(config)?;
        let users = UserDirectory::new(backend.clone(), config.user_page_size);

        Ok(Self {
            teams: TeamRoster::new(backend.clone()),
            events: EventBoard::new(backend.clone()),
            helper_tasks: HelperTaskBoard::new(backend.clone()),
            session: SessionService::new(config.clone(), backend.clone(), auth, users.clone()),
            users,
            backend,
        })
    }
}
