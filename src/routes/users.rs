use actix_web::web;

use crate::handlers::users;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(users::list_users))
            .route("/search", web::get().to(users::search_users))
            .route("/refresh", web::post().to(users::refresh_users))
            .route("/admin-bootstrap", web::post().to(users::admin_bootstrap))
            .route("/role/{role}", web::get().to(users::users_by_role))
            .route("/{id}", web::get().to(users::get_user))
            .route("/{id}", web::put().to(users::update_user))
            .route("/{id}", web::delete().to(users::deactivate_user))
            .route("/{id}/roles", web::put().to(users::set_roles))
            .route("/{id}/active", web::put().to(users::set_active)),
    );
}
