//! Merge puzzle move advisor API.
//!
//! Accepts a board as a comma-separated query parameter and answers with
//! the wire code of the chosen direction ("0".."3"). Repeatedly asking for
//! the same board gets a random answer instead of a search, so clients
//! stuck replaying one position cannot loop forever.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use fuse_core::{Board, Direction};
use fuse_solver::MoveSelector;

/// Identical boards requested this many times in a row get a uniformly
/// random answer instead of a search.
const REPEAT_LIMIT: u32 = 3;

const BIND_ADDR: &str = "0.0.0.0:5000";

/// Shared application state.
struct AppStateInner {
    selector: MoveSelector,
    /// Raw state string -> times requested. Never reset within a run.
    request_counter: Mutex<HashMap<String, u32>>,
}

type AppState = Arc<AppStateInner>;

#[derive(Deserialize)]
struct MoveQuery {
    state: Option<String>,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

/// Parse a comma-separated board representation into its 16 cell values.
fn parse_board(state: &str) -> Result<Board, String> {
    let values = state
        .split(',')
        .map(|cell| cell.trim().parse::<u32>())
        .collect::<Result<Vec<u32>, _>>()
        .map_err(|_| format!("Invalid cell value in state: {state}"))?;

    let cells: [u32; 16] = values
        .try_into()
        .map_err(|got: Vec<u32>| format!("Expected 16 cells, got {}", got.len()))?;

    Ok(Board::from_cells(cells))
}

async fn best_move(
    State(state): State<AppState>,
    Query(query): Query<MoveQuery>,
) -> Result<String, (StatusCode, String)> {
    let raw = match query.state {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err((StatusCode::BAD_REQUEST, "Missing game state!".to_string())),
    };

    let repeats = {
        let mut counter = state.request_counter.lock().unwrap();
        let count = counter.entry(raw.clone()).or_insert(0);
        *count += 1;
        *count
    };

    let board = parse_board(&raw).map_err(|detail| (StatusCode::BAD_REQUEST, detail))?;

    let direction = if repeats >= REPEAT_LIMIT {
        Direction::random(&mut rand::rng())
    } else {
        let state = state.clone();
        tokio::task::spawn_blocking(move || state.selector.best_move(board))
            .await
            .map_err(|err| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Search task failed: {err}"),
                )
            })?
    };

    Ok(direction.code().to_string())
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
    println!("\nShutting down");
}

#[tokio::main]
async fn main() {
    let state: AppState = Arc::new(AppStateInner {
        selector: MoveSelector::new(),
        request_counter: Mutex::new(HashMap::new()),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(best_move))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(BIND_ADDR).await.unwrap();
    println!("Move advisor running on http://localhost:5000");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}
