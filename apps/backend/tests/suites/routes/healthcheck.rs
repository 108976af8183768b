use std::sync::Arc;

use actix_web::{test, web, App};
use beats_backend::routes;
use serde_json::Value;

use crate::support::oracle::ScriptedOracle;
use crate::support::state::state_with;

#[actix_web::test]
async fn health_reports_store_and_sessions() {
    let state = state_with(Arc::new(ScriptedOracle::new())).await;
    state
        .games
        .start_session(beats_backend::domain::Persona::Default)
        .await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["active_sessions"], 1);
    assert_eq!(body["inflight_judgments"], 0);
    assert!(body["app_version"].as_str().is_some_and(|v| !v.is_empty()));
    assert!(body["time"].is_string());
}
