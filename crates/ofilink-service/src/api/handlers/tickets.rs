//! Ticket handlers

use super::bad_body;
use crate::api::state::AppState;
use crate::error::ApiResult;
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use ofilink_store::{NewTicket, Ticket};

/// List all tickets, most recent first
pub async fn list_tickets(State(state): State<AppState>) -> ApiResult<Json<Vec<Ticket>>> {
    Ok(Json(state.store.list_tickets().await?))
}

/// Create a ticket
pub async fn create_ticket(
    State(state): State<AppState>,
    payload: Result<Json<NewTicket>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Ticket>)> {
    let Json(input) = payload.map_err(bad_body)?;
    let ticket = state.store.append_ticket(input).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}
