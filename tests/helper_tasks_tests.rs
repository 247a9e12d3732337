use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[macro_use]
mod common;

#[actix_web::test]
async fn task_lifecycle_updates_stats() {
    let (state, config) = common::demo_state().await;
    let trainer = common::token_for(&state, common::TRAINER).await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/helper-tasks")
        .insert_header(common::bearer(&trainer))
        .set_json(json!({ "task": "Kuchenverkauf", "priority": "high" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], json!("open"));
    let task_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/helper-tasks/{}/no-show", task_id))
        .insert_header(common::bearer(&trainer))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], json!("no-show"));

    let req = test::TestRequest::get()
        .uri("/api/v1/helper-tasks/stats")
        .insert_header(common::bearer(&trainer))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["data"],
        json!({ "total": 2, "open": 1, "completed": 0, "noShow": 1 })
    );
}

#[actix_web::test]
async fn assignee_may_complete_but_not_delete() {
    let (state, config) = common::demo_state().await;
    let player = common::token_for(&state, common::PLAYER).await;
    let task_id = state.helper_tasks.list().await[0].id;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/helper-tasks/{}/complete", task_id))
        .insert_header(common::bearer(&player))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], json!("completed"));
    assert!(body["data"]["completedDate"].is_string());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/helper-tasks/{}", task_id))
        .insert_header(common::bearer(&player))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn reopening_keeps_completion_date() {
    let (state, config) = common::demo_state().await;
    let admin = common::token_for(&state, common::ADMIN).await;
    let task_id = state.helper_tasks.list().await[0].id;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/helper-tasks/{}/complete", task_id))
        .insert_header(common::bearer(&admin))
        .to_request();
    let completed: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/helper-tasks/{}/reopen", task_id))
        .insert_header(common::bearer(&admin))
        .to_request();
    let reopened: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(reopened["data"]["status"], json!("open"));
    assert_eq!(
        reopened["data"]["completedDate"],
        completed["data"]["completedDate"]
    );
}
