//! OFILINK persistence core.
//!
//! A single JSON document holds both record collections and their id counters.
//! Every operation reads the whole document, and every append writes the whole
//! document back before returning:
//! - [`ensure_initialized`] seeds the document on first use
//! - [`DocumentStore`] assigns ids and appends clients and tickets
//! - [`DocumentBackend`] abstracts where the document lives (file or memory)

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod backend;
mod error;
pub mod file;
pub mod memory;
mod model;
mod store;

pub use backend::DocumentBackend;
pub use error::{StoreError, StoreResult, ValidationError};
pub use file::{ensure_initialized, JsonFileBackend};
pub use memory::MemoryBackend;
pub use model::{
    Client, Document, NewClient, NewTicket, Ticket, CREATED_AT_FORMAT, DEFAULT_CHANNEL,
    DEFAULT_PRIORITY, DEFAULT_STAGE, DEFAULT_STATUS,
};
pub use store::DocumentStore;
