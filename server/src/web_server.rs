use axum::{
    Json, Router,
    extract::{Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use common::{RoomName, log};

use crate::room_registry::RoomRegistry;
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub registry: RoomRegistry,
    pub max_line_bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub service: String,
    pub rooms: usize,
}

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    pub room: Option<String>,
}

pub fn router(state: WebServerState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(status_handler))
        .route("/ws", get(ws_upgrade_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server(listener: TcpListener, state: WebServerState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log!("WebSocket relay listening on {}", addr);
    }
    axum::serve(listener, router(state)).await
}

async fn status_handler(State(state): State<WebServerState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        service: "tic-tac-toe-relay".to_string(),
        rooms: state.registry.room_count().await,
    })
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<RoomQuery>,
    State(state): State<WebServerState>,
) -> Response {
    let room = match query.room.as_deref() {
        Some(name) => match RoomName::parse(name) {
            Ok(room) => room,
            Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
        },
        None => RoomName::default(),
    };

    ws.on_upgrade(move |socket| handle_websocket(socket, room, state.registry, state.max_line_bytes))
}
