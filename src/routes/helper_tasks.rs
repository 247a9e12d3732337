use actix_web::web;

use crate::handlers::helper_tasks;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/helper-tasks")
            .route("", web::get().to(helper_tasks::list_tasks))
            .route("", web::post().to(helper_tasks::create_task))
            .route("/stats", web::get().to(helper_tasks::task_stats))
            .route("/{id}", web::put().to(helper_tasks::update_task))
            .route("/{id}", web::delete().to(helper_tasks::delete_task))
            .route("/{id}/complete", web::post().to(helper_tasks::complete_task))
            .route("/{id}/no-show", web::post().to(helper_tasks::mark_no_show))
            .route("/{id}/reopen", web::post().to(helper_tasks::reopen_task)),
    );
}
