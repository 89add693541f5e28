//! API route handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, error};

use crate::pipeline::{PipelineEngine, PipelineError, TripRequest};
use crate::state::StateManager;
use crate::threads::ThreadDirectory;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PipelineEngine>,
    pub directory: ThreadDirectory,
    pub state: StateManager,
}

/// Build the API router with permissive CORS
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/threads", get(list_threads))
        .route("/thread/chats", get(fetch_thread_chats))
        .route("/threads/:thread_id", delete(delete_thread))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error payload matching the {"detail": ...} convention of the API
#[derive(Debug, Serialize)]
struct ApiError {
    detail: String,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(ApiError { detail: detail.into() })).into_response()
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    thread_id: String,
    destination: String,
    budget: f64,
    dates: String,
    preferences: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    thread_id: String,
    plan: String,
    cost_breakdown: BTreeMap<String, f64>,
    search_result: String,
}

/// POST /chat - run the pipeline for a thread and return the plan
async fn chat(State(app): State<AppState>, Json(request): Json<ChatRequest>) -> Response {
    debug!(thread_id = %request.thread_id, destination = %request.destination, "chat: called");

    let trip = TripRequest {
        thread_id: request.thread_id.clone(),
        destination: request.destination,
        budget: request.budget,
        dates: request.dates,
        preferences: request.preferences,
    };

    match app.engine.run(&trip).await {
        Ok(state) => Json(ChatResponse {
            thread_id: request.thread_id,
            plan: state.plan,
            cost_breakdown: state.cost_breakdown,
            search_result: state.search_result,
        })
        .into_response(),
        Err(e @ PipelineError::InvalidBudget) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e @ PipelineError::Generation(_)) => {
            error!(error = %e, "chat: generation failed");
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            error!(error = %e, "chat: pipeline failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /threads - list all saved threads, newest first
async fn list_threads(State(app): State<AppState>) -> Response {
    debug!("list_threads: called");
    match app.directory.list_threads().await {
        Ok(threads) => Json(threads).into_response(),
        Err(e) => {
            error!(error = %e, "list_threads: failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThreadChatsQuery {
    thread_id: String,
}

/// GET /thread/chats?thread_id=... - fetch the turns of one thread
async fn fetch_thread_chats(State(app): State<AppState>, Query(query): Query<ThreadChatsQuery>) -> Response {
    debug!(thread_id = %query.thread_id, "fetch_thread_chats: called");
    match app.directory.fetch_thread(&query.thread_id).await {
        Ok(turns) if turns.is_empty() => {
            error_response(StatusCode::NOT_FOUND, "Thread not found or no chats available")
        }
        Ok(turns) => Json(turns).into_response(),
        Err(e) => {
            error!(error = %e, "fetch_thread_chats: failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: String,
}

/// DELETE /threads/:thread_id - remove all checkpoints of a thread
async fn delete_thread(State(app): State<AppState>, Path(thread_id): Path<String>) -> Response {
    debug!(%thread_id, "delete_thread: called");
    match app.state.delete_thread(&thread_id).await {
        Ok(_) => Json(DeleteResponse {
            message: format!("Thread {thread_id} deleted successfully"),
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "delete_thread: failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /health - liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
