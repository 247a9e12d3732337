use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[macro_use]
mod common;

#[actix_web::test]
async fn demo_sign_in_returns_token_and_profile() {
    let (state, config) = common::demo_state().await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/sign-in")
        .set_json(json!({ "email": "player@example.com", "password": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["mode"], json!("offline"));
    assert_eq!(body["data"]["user"]["name"], json!("Player Max"));

    let token = body["data"]["accessToken"].as_str().unwrap().to_string();
    let req = test::TestRequest::get()
        .uri("/api/v1/auth/session")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["email"], json!("player@example.com"));
}

#[actix_web::test]
async fn demo_sign_in_with_unknown_email_fails() {
    let (state, config) = common::demo_state().await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/sign-in")
        .set_json(json!({ "email": "ghost@example.com", "password": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[actix_web::test]
async fn session_requires_bearer_token() {
    let (state, config) = common::demo_state().await;
    let app = demo_app!(state, config);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .insert_header(common::bearer("not-a-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sign_up_and_oauth_are_unavailable_offline() {
    let (state, config) = common::demo_state().await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/sign-up")
        .set_json(json!({
            "email": "new@example.com",
            "password": "secret123",
            "name": "New Member"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/oauth/google")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn profile_update_changes_own_name_only() {
    use fake::{Fake, faker::name::en::Name};

    let (state, config) = common::demo_state().await;
    let token = common::token_for(&state, common::PLAYER).await;
    let app = demo_app!(state, config);
    let name: String = Name().fake();

    let req = test::TestRequest::put()
        .uri("/api/v1/auth/profile")
        .insert_header(common::bearer(&token))
        .set_json(json!({ "name": name, "roles": ["admin"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], json!(name));
    assert_eq!(body["data"]["roles"], json!(["player"]));

    let stored = state.users.find(common::PLAYER).await.unwrap();
    assert_eq!(stored.name, name);
}

#[actix_web::test]
async fn sign_out_succeeds_offline() {
    let (state, config) = common::demo_state().await;
    let token = common::token_for(&state, common::TRAINER).await;
    let mut events = state.session.subscribe();
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/sign-out")
        .insert_header(common::bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        events.recv().await.unwrap(),
        clubhub::services::session::AuthEvent::SignedOut {
            user_id: common::TRAINER
        }
    );
}

#[actix_web::test]
async fn health_reports_offline_mode_and_correlation_id() {
    let (state, config) = common::demo_state().await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("X-Correlation-ID", "health-check"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("x-correlation-id").unwrap(),
        "health-check"
    );
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["mode"], json!("offline"));
}
