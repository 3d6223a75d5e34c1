use crate::model::Document;
use crate::StoreResult;
use async_trait::async_trait;

/// Where the document lives.
///
/// `load` and `save` always move the whole document; backends keep no
/// partial state between calls.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Read the current document, initializing storage first if needed.
    async fn load(&self) -> StoreResult<Document>;

    /// Replace the stored document.
    async fn save(&self, document: &Document) -> StoreResult<()>;

    /// Short name for health and startup logs.
    fn label(&self) -> &'static str;
}
