use actix_web::web;

use crate::handlers::events;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .route("", web::get().to(events::list_events))
            .route("", web::post().to(events::create_event))
            .route("/upcoming", web::get().to(events::upcoming_events))
            .route("/personal", web::get().to(events::personal_events))
            .route("/day/{date}", web::get().to(events::events_on_day))
            .route("/{id}", web::get().to(events::get_event))
            .route("/{id}", web::put().to(events::update_event))
            .route("/{id}", web::delete().to(events::delete_event))
            .route("/{id}/join", web::post().to(events::join_event))
            .route("/{id}/leave", web::post().to(events::leave_event)),
    );
}
