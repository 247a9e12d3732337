use actix_web::web;

use crate::handlers::health;

pub mod auth;
pub mod events;
pub mod helper_tasks;
pub mod permissions;
pub mod teams;
pub mod users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health)).service(
        web::scope("/api/v1")
            .configure(auth::configure)
            .configure(permissions::configure)
            .configure(users::configure)
            .configure(teams::configure)
            .configure(events::configure)
            .configure(helper_tasks::configure),
    );
}
