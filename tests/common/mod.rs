#![allow(dead_code)]

use actix_web::web;
use uuid::Uuid;

use clubhub::auth::issue_token;
use clubhub::services::{Backend, demo, session};
use clubhub::{AppState, Config};

pub const ADMIN: Uuid = demo::ADMIN_ID;
pub const TRAINER: Uuid = demo::TRAINER_ID;
pub const PLAYER: Uuid = demo::PLAYER_ID;

/// App state running on the demo dataset; no database involved.
pub async fn demo_state() -> (web::Data<AppState>, web::Data<Config>) {
    let config = Config::test_config();
    let state = AppState::new(&config, Backend::demo()).expect("app state");
    session::bootstrap(&state, config.bootstrap_timeout()).await;

    (web::Data::new(state), web::Data::new(config))
}

pub async fn token_for(state: &AppState, user_id: Uuid) -> String {
    let user = state.users.find(user_id).await.expect("demo user");
    issue_token(&user, &Config::test_config()).expect("token")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Full application with every route, wired to the given state.
macro_rules! demo_app {
    ($state:expr, $config:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .app_data($config.clone())
                .wrap(actix_web::middleware::from_fn(
                    clubhub::middleware::correlation_id,
                ))
                .configure(clubhub::routes::configure),
        )
        .await
    };
}
