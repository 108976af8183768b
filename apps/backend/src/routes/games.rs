use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::{Persona, SessionId};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    persona: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GuessRequest {
    session_id: String,
    guess: Option<String>,
}

/// Malformed ids can never name a live session.
fn parse_session_id(raw: &str) -> Result<SessionId, AppError> {
    raw.parse::<SessionId>()
        .map_err(|_| DomainError::session_not_found(raw).into())
}

async fn start_game(
    query: web::Query<StartQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let persona = Persona::parse(query.persona.as_deref());
    let started = app_state.games.start_session(persona).await;
    Ok(HttpResponse::Ok().json(started))
}

pub async fn submit_guess(
    body: web::Json<GuessRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let GuessRequest { session_id, guess } = body.into_inner();
    let session_id = parse_session_id(&session_id)?;
    let guess =
        guess.ok_or_else(|| AppError::invalid(ErrorCode::EmptyInput, "Guess cannot be empty"))?;

    let result = app_state.games.submit_guess(session_id, &guess).await?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_history(
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = parse_session_id(&path.into_inner())?;
    let history = app_state.games.history(session_id).await?;
    Ok(HttpResponse::Ok().json(history))
}

async fn get_statistics(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(app_state.games.statistics().await))
}

async fn get_leaderboard(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let top_scores = app_state.games.leaderboard();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "top_scores": top_scores })))
}

/// Paths are relative to the `/api/games` scope. `main.rs` mounts
/// [`submit_guess`] under its own scope so it can carry a tighter limit.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/start", web::post().to(start_game))
        .route("/statistics", web::get().to(get_statistics))
        .route("/leaderboard", web::get().to(get_leaderboard))
        .route("/{session_id}/history", web::get().to(get_history));
}

pub fn configure_guess_route(cfg: &mut web::ServiceConfig) {
    cfg.route("/guess", web::post().to(submit_guess));
}
