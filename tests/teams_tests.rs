use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[macro_use]
mod common;

use clubhub::services::demo;

#[actix_web::test]
async fn my_teams_follow_roles() {
    let (state, config) = common::demo_state().await;
    let trainer = common::token_for(&state, common::TRAINER).await;
    let admin = common::token_for(&state, common::ADMIN).await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::get()
        .uri("/api/v1/teams/mine")
        .insert_header(common::bearer(&trainer))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["U14 Boys", "U16 Girls"]);

    let req = test::TestRequest::get()
        .uri("/api/v1/teams/mine")
        .insert_header(common::bearer(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn adding_a_player_twice_keeps_one_entry() {
    let (state, config) = common::demo_state().await;
    let trainer = common::token_for(&state, common::TRAINER).await;
    let app = demo_app!(state, config);
    let uri = format!(
        "/api/v1/teams/{}/players/{}",
        demo::TEAM_LIGA_M,
        common::PLAYER
    );

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(common::bearer(&trainer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["players"], json!([common::PLAYER.to_string()]));
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/teams/{}/players", demo::TEAM_LIGA_M))
        .insert_header(common::bearer(&trainer))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["name"], json!("Player Max"));

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(common::bearer(&trainer))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["players"], json!([]));
}

#[actix_web::test]
async fn unknown_roster_list_is_not_found() {
    let (state, config) = common::demo_state().await;
    let trainer = common::token_for(&state, common::TRAINER).await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::post()
        .uri(&format!(
            "/api/v1/teams/{}/coaches/{}",
            demo::TEAM_U14_M,
            common::PLAYER
        ))
        .insert_header(common::bearer(&trainer))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn players_cannot_create_and_trainers_need_a_season() {
    let (state, config) = common::demo_state().await;
    let trainer = common::token_for(&state, common::TRAINER).await;
    let player = common::token_for(&state, common::PLAYER).await;
    let app = demo_app!(state, config);
    let team = json!({
        "name": "U20 Mixed",
        "category": "U20",
        "gender": "Mixed",
        "season": "",
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/teams")
        .insert_header(common::bearer(&player))
        .set_json(&team)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/teams")
        .insert_header(common::bearer(&trainer))
        .set_json(&team)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn deleted_teams_disappear() {
    let (state, config) = common::demo_state().await;
    let admin = common::token_for(&state, common::ADMIN).await;
    let app = demo_app!(state, config);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/teams/{}", demo::TEAM_U16_F))
        .insert_header(common::bearer(&admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/teams/{}", demo::TEAM_U16_F))
        .insert_header(common::bearer(&admin))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
