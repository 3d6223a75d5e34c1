//! In-memory backend.
//!
//! Deterministic and test-friendly; nothing survives the process.

use crate::backend::DocumentBackend;
use crate::model::Document;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    document: RwLock<Document>,
    saves: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document: RwLock::new(document),
            saves: AtomicUsize::new(0),
        }
    }

    /// Number of completed saves.
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn load(&self) -> StoreResult<Document> {
        let document = self.document.read().await.clone();
        document
            .check_counters()
            .map_err(|reason| StoreError::corrupt("<memory>", reason))?;
        Ok(document)
    }

    async fn save(&self, document: &Document) -> StoreResult<()> {
        document
            .check_counters()
            .map_err(StoreError::InvalidDocument)?;
        *self.document.write().await = document.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn label(&self) -> &'static str {
        "memory"
    }
}
