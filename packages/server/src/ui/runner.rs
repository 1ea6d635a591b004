//! Router construction and server entry point.

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handler, signal::shutdown_signal, state::AppState};
use crate::{
    config::ServerConfig, error::ServerError, infrastructure::repository::SqliteDatabase,
};

/// Build the CORS layer from the allowed-origin setting
///
/// `*` (or blank) accepts any origin without credentials.
/// An explicit list accepts only those origins, with credentials.
pub fn build_cors(config: &ServerConfig) -> Result<CorsLayer, ServerError> {
    let Some(origins) = config.allowed_origins() else {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    };

    let origins = origins
        .into_iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| ServerError::InvalidOrigin(origin))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT_CHARSET,
            header::AUTHORIZATION,
        ]))
}

/// Build the application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/rooms/{room}/messages", get(handler::get_room_messages))
        .route("/dm/{peer}/messages", get(handler::get_direct_messages))
        .route(
            "/groups",
            get(handler::list_groups).post(handler::create_group),
        )
        .route("/ws", get(handler::websocket_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the chat server until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let cors = build_cors(&config)?;
    let db = SqliteDatabase::open(&config.database_path).map_err(|source| ServerError::Database {
        path: config.database_path.clone(),
        source,
    })?;
    tracing::info!("Using database '{}'", config.database_path);
    let app = build_router(AppState::sqlite(db), cors);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!("Chat server listening on http://{}", address);
    tracing::info!("WebSocket endpoint: ws://{}/ws", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}
