use actix_web::{
    http::StatusCode,
    web::{Data, Json},
    HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};

use crate::config::AppState;
use crate::response::json_error;

#[derive(Debug, Serialize)]
struct HighscoreResponse {
    highscore: i64,
}

#[derive(Debug, Serialize)]
struct LeaderboardEntry {
    score: i64,
}

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
    leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitScoreRequest {
    highscore: i64,
}

#[derive(Debug, Serialize)]
struct SubmitScoreResponse {
    success: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    stored_scores: usize,
    leaderboard_limit: usize,
}

pub(crate) async fn health(state: Data<AppState>) -> impl Responder {
    match state.store.count() {
        Ok(stored_scores) => HttpResponse::Ok().json(HealthResponse {
            status: "healthy",
            service: "road-dodge-api",
            stored_scores,
            leaderboard_limit: state.leaderboard_limit,
        }),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

pub(crate) async fn get_highscore(state: Data<AppState>) -> impl Responder {
    match state.store.highscore() {
        Ok(highscore) => HttpResponse::Ok().json(HighscoreResponse { highscore }),
        Err(e) => {
            tracing::error!("get_highscore failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

pub(crate) async fn get_leaderboard(state: Data<AppState>) -> impl Responder {
    match state.store.leaderboard(state.leaderboard_limit) {
        Ok(scores) => HttpResponse::Ok().json(LeaderboardResponse {
            leaderboard: scores
                .into_iter()
                .map(|score| LeaderboardEntry { score })
                .collect(),
        }),
        Err(e) => {
            tracing::error!("get_leaderboard failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

/// Unconditional append. There is deliberately no check that the value
/// beats the stored highscore - the client decides when to submit.
pub(crate) async fn submit_score(
    state: Data<AppState>,
    req: Json<SubmitScoreRequest>,
) -> impl Responder {
    match state.store.insert(req.highscore) {
        Ok(()) => HttpResponse::Ok().json(SubmitScoreResponse { success: true }),
        Err(e) => {
            tracing::error!("submit_score failed: {e}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}
