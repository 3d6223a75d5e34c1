//! REST API

pub mod handlers;
pub mod router;
pub mod state;

pub use router::{build_router, cors_layer};
pub use state::AppState;
