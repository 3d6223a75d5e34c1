//! API request handlers

mod clients;
mod health;
mod tickets;

pub use clients::*;
pub use health::*;
pub use tickets::*;

use crate::error::ApiError;
use axum::extract::rejection::JsonRejection;

pub(crate) fn bad_body(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(format!("invalid request body: {}", rejection.body_text()))
}
