//! HTTP API endpoint handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    domain::{ConnectionId, RoomName},
    infrastructure::dto::http::{
        CreateGroupRequest, DirectMessagesQuery, ErrorResponse, GroupDto, MessageDto,
    },
    ui::state::AppState,
    usecase::{ChatError, CreateGroupUseCase},
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Non-private history of a room, oldest first
pub async fn get_room_messages(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let room = RoomName::new(room).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;

    let messages = state.messages.find_by_room(&room).await.map_err(|e| {
        tracing::error!("Failed to load messages of '{}': {}", room, e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load messages")
    })?;

    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

/// Direct messages between `me` and `peer` in either direction, oldest first
pub async fn get_direct_messages(
    State(state): State<AppState>,
    Path(peer): Path<String>,
    Query(query): Query<DirectMessagesQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let (Ok(me), Ok(peer)) = (ConnectionId::new(query.me), ConnectionId::new(peer)) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "missing peer or me"));
    };

    let messages = state
        .messages
        .find_by_participants(&me, &peer)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load direct messages '{}'/'{}': {}", me, peer, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load messages")
        })?;

    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

/// Group catalog
pub async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<GroupDto>>, ApiError> {
    let groups = state.groups.list().await.map_err(|e| {
        tracing::error!("Failed to list groups: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to load groups")
    })?;

    Ok(Json(groups.iter().map(GroupDto::from).collect()))
}

/// Create a group and announce it to every connection
pub async fn create_group(
    State(state): State<AppState>,
    body: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<Json<GroupDto>, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::debug!("Rejected group request: {}", e);
        api_error(StatusCode::BAD_REQUEST, "invalid input")
    })?;

    let group = CreateGroupUseCase::new(state.groups.clone(), state.hub.clone())
        .execute(&request.name)
        .await
        .map_err(|e| match e {
            ChatError::Validation(_) => api_error(StatusCode::BAD_REQUEST, "invalid input"),
            other => api_error(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    Ok(Json(GroupDto::from(&group)))
}
