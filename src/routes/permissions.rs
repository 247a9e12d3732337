use actix_web::web;

use crate::handlers::permissions;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/permissions").route("/check", web::get().to(permissions::check)));
}
