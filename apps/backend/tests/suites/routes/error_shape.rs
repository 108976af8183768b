// Failures answer with Problem Details carrying the request's trace id.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use backend_test_support::problem_details::assert_problem_details;
use beats_backend::middleware::request_trace::RequestTrace;
use beats_backend::routes;
use serde_json::json;

use crate::support::oracle::ScriptedOracle;
use crate::support::state::state_with;

#[actix_web::test]
async fn unknown_and_malformed_sessions_are_not_found() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let unknown = uuid::Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{unknown}/history"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "SESSION_NOT_FOUND", StatusCode::NOT_FOUND, None).await;

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": "not-a-uuid", "guess": "Paper"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        "SESSION_NOT_FOUND",
        StatusCode::NOT_FOUND,
        Some("not-a-uuid"),
    )
    .await;
}

#[actix_web::test]
async fn missing_guess_field_is_empty_input() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    let games = state.games.clone();
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let id = games
        .start_session(beats_backend::domain::Persona::Default)
        .await
        .session_id;
    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": id.to_string()}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(
        resp,
        "EMPTY_INPUT",
        StatusCode::BAD_REQUEST,
        Some("Guess cannot be empty"),
    )
    .await;
}

#[actix_web::test]
async fn malformed_json_is_bad_request() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"session_id\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None).await;
}
