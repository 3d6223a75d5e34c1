//! Client handlers

use super::bad_body;
use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use ofilink_store::{Client, NewClient};

/// List all clients in insertion order
pub async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<Client>>> {
    Ok(Json(state.store.list_clients().await?))
}

/// Create a client
pub async fn create_client(
    State(state): State<AppState>,
    payload: Result<Json<NewClient>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let Json(input) = payload.map_err(bad_body)?;
    let client = state.store.append_client(input).await?;
    Ok((StatusCode::CREATED, Json(client)))
}
