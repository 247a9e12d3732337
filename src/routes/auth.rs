use actix_web::web;

use crate::handlers::auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/sign-in", web::post().to(auth::sign_in))
            .route("/sign-up", web::post().to(auth::sign_up))
            .route("/sign-out", web::post().to(auth::sign_out))
            .route("/session", web::get().to(auth::session))
            .route("/oauth/{provider}", web::get().to(auth::oauth))
            .route("/profile", web::put().to(auth::update_profile)),
    );
}
