use actix_web::web;

use crate::handlers::teams;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .route("", web::get().to(teams::list_teams))
            .route("", web::post().to(teams::create_team))
            .route("/mine", web::get().to(teams::my_teams))
            .route("/{id}", web::get().to(teams::get_team))
            .route("/{id}", web::put().to(teams::update_team))
            .route("/{id}", web::delete().to(teams::delete_team))
            .route("/{id}/{members}", web::get().to(teams::list_members))
            .route(
                "/{id}/{members}/{user_id}",
                web::post().to(teams::add_member),
            )
            .route(
                "/{id}/{members}/{user_id}",
                web::delete().to(teams::remove_member),
            ),
    );
}
