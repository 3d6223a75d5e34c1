//! JSON file backend.
//!
//! The document is stored pretty-printed so it can be inspected and edited by
//! hand. Saves go through a sibling temporary file and a rename, so readers
//! never observe a half-written document.

use crate::backend::DocumentBackend;
use crate::model::Document;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Make sure a parseable document exists at `path`.
///
/// Creates missing parent directories and writes the seed document when no
/// file exists. Returns `true` only when this call wrote the seed; an existing
/// file is left untouched.
///
/// The seed is fully written to a uniquely named sibling file and then
/// published with a hard link, which fails instead of overwriting. Concurrent
/// callers therefore either see no file or a complete one.
pub async fn ensure_initialized(path: &Path) -> StoreResult<bool> {
    if fs::try_exists(path).await.unwrap_or(false) {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let seed_path = path.with_extension(format!("seed-{}.tmp", Uuid::new_v4()));
    let published = publish_seed(path, &seed_path).await;
    if let Err(e) = fs::remove_file(&seed_path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %seed_path.display(), error = %e, "failed to remove seed file");
        }
    }

    if published? {
        info!(path = %path.display(), "seeded data file");
        return Ok(true);
    }
    Ok(false)
}

async fn publish_seed(path: &Path, seed_path: &Path) -> StoreResult<bool> {
    let bytes = encode(&Document::seed())?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(seed_path)
        .await
        .map_err(|e| StoreError::io(seed_path, e))?;
    file.write_all(&bytes)
        .await
        .map_err(|e| StoreError::io(seed_path, e))?;
    file.sync_all()
        .await
        .map_err(|e| StoreError::io(seed_path, e))?;
    drop(file);

    match fs::hard_link(seed_path, path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(StoreError::io(path, e)),
    }
}

/// Production backend bound to a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }
}

#[async_trait]
impl DocumentBackend for JsonFileBackend {
    async fn load(&self) -> StoreResult<Document> {
        ensure_initialized(&self.path).await?;

        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        let document: Document = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?;
        document
            .check_counters()
            .map_err(|reason| StoreError::corrupt(&self.path, reason))?;

        Ok(document)
    }

    async fn save(&self, document: &Document) -> StoreResult<()> {
        document
            .check_counters()
            .map_err(StoreError::InvalidDocument)?;
        ensure_initialized(&self.path).await?;

        let bytes = encode(document)?;
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, bytes)
            .await
            .map_err(|e| StoreError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            clients = document.clients.len(),
            tickets = document.tickets.len(),
            "data file written"
        );
        Ok(())
    }

    fn label(&self) -> &'static str {
        "json-file"
    }
}

fn encode(document: &Document) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(document).map_err(|e| StoreError::Serialization(e.to_string()))
}
