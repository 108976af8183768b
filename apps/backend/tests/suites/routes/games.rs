// Game endpoints end to end through the actix service.

use std::sync::Arc;

use actix_web::{test, web, App};
use beats_backend::middleware::request_trace::RequestTrace;
use beats_backend::routes;
use serde_json::{json, Value};

use crate::support::oracle::ScriptedOracle;
use crate::support::state::state_with;

#[actix_web::test]
async fn start_guess_and_history_flow() {
    let oracle = Arc::new(ScriptedOracle::new().with("Paper", "Rain", false));
    let state = state_with(oracle).await;
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/games/start?persona=cheery")
        .to_request();
    let started: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started["start_word"], "Rock");
    assert_eq!(started["history"], json!(["Rock"]));
    assert_eq!(started["score"], 0);
    assert_eq!(started["persona"], "cheery");
    let session_id = started["session_id"].as_str().expect("session id").to_string();

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": session_id, "guess": "Paper"}))
        .to_request();
    let correct: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(correct["outcome"]["kind"], "correct");
    assert_eq!(correct["accepted"], true);
    assert_eq!(correct["retryable"], false);
    assert_eq!(correct["new_word"], "Paper");
    assert_eq!(correct["score"], 1);
    assert_eq!(correct["game_over"], false);
    assert_eq!(correct["word_count_message"], "Paper → 1 total guesses so far");

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": session_id, "guess": "Rain"}))
        .to_request();
    let lost: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(lost["outcome"]["kind"], "incorrect");
    assert_eq!(lost["game_over"], true);
    assert_eq!(lost["history"], json!(["Rock", "Paper"]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/games/{session_id}/history"))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        history,
        json!({"history": ["Rock", "Paper"], "score": 1, "game_over": true})
    );
}

#[actix_web::test]
async fn gameplay_rejections_are_ok_responses() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/games/start").to_request();
    let started: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(started["persona"], "default");
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": session_id, "guess": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["outcome"]["kind"], "empty_input");

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": session_id, "guess": "aaaaaaa"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"]["kind"], "content_rejected");
    assert_eq!(body["retryable"], true);
    assert_eq!(
        body["outcome"]["reason"],
        "Content contains repetitive patterns"
    );
    assert_eq!(body["game_over"], false);

    let req = test::TestRequest::post()
        .uri("/api/games/guess")
        .set_json(json!({"session_id": session_id, "guess": "rock"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"]["kind"], "duplicate_word");
    assert_eq!(body["game_over"], true);
}

#[actix_web::test]
async fn statistics_and_leaderboard_report_finished_games() {
    let oracle = Arc::new(ScriptedOracle::new().with("Paper", "Rain", false));
    let state = state_with(oracle).await;
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
    games.submit_guess(id, "Paper").await.unwrap();
    games.submit_guess(id, "Rain").await.unwrap();

    let req = test::TestRequest::get().uri("/api/games/statistics").to_request();
    let stats: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats["active_sessions"], 1);
    assert_eq!(stats["total_games"], 1);
    assert_eq!(stats["max_score"], 1);
    assert_eq!(stats["average_score"], 1.0);
    assert_eq!(stats["popular_words"][0]["word"], "paper");

    let req = test::TestRequest::get().uri("/api/games/leaderboard").to_request();
    let board: Value = test::call_and_read_body_json(&app, req).await;
    let top = board["top_scores"].as_array().expect("top_scores array");
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["position"], 1);
    assert_eq!(top[0]["score"], 1);
    assert!(top[0]["finished_at"].is_string());
}
