//! OFILINK API service library
//!
//! - REST handlers for clients and tickets over [`ofilink_store`]
//! - AIConta compliance placeholder routes
//! - Layered configuration and server lifecycle

#![deny(unsafe_code)]

pub mod aiconta;
pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use api::{build_router, AppState};
pub use config::{Overrides, ServiceConfig};
pub use error::{ApiError, ServiceError};
pub use server::Server;
