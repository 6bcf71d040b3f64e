//! Filesystem document store
//!
//! Documents are written under a root directory, one file per path. Writes go
//! to a temporary sibling first and are hard-linked into place, so readers
//! never see a partial file and an existing document is never replaced.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::store::{check_path, DocumentStore, StoredDocument};

#[derive(Debug, Clone)]
pub struct LocalFsDocumentStore {
    root: PathBuf,
}

impl LocalFsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, PortError> {
        check_path(path)?;
        Ok(path.split('/').fold(self.root.clone(), |acc, segment| acc.join(segment)))
    }
}

fn io_error(operation: &str, path: &str, error: std::io::Error) -> PortError {
    match error.kind() {
        ErrorKind::NotFound => PortError::not_found("Document", path),
        ErrorKind::AlreadyExists => PortError::conflict(format!("Document {} already exists", path)),
        _ => PortError::Internal {
            message: format!("{} {}: {}", operation, path, error),
            source: Some(Box::new(error)),
        },
    }
}

impl DomainPort for LocalFsDocumentStore {}

#[async_trait]
impl HealthCheckable for LocalFsDocumentStore {
    async fn health_check(&self) -> HealthCheckResult {
        let mut result = HealthCheckResult::healthy("local-fs-document-store");
        match fs::create_dir_all(&self.root).await {
            Ok(()) => result,
            Err(e) => {
                result.status = AdapterHealth::Unhealthy;
                result.message = Some(format!("{}: {}", self.root.display(), e));
                result
            }
        }
    }
}

#[async_trait]
impl DocumentStore for LocalFsDocumentStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<StoredDocument, PortError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory for", path, e))?;
        }

        // a second writer of the same path finds the staging file taken
        let staging = target.with_extension("partial");
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staging)
            .await
            .map_err(|e| io_error("write", path, e))?;
        let written = async {
            file.write_all(bytes).await?;
            file.sync_all().await?;
            fs::hard_link(&staging, &target).await
        }
        .await;
        if let Err(e) = fs::remove_file(&staging).await {
            debug!(path = %staging.display(), error = %e, "Failed to remove staging file");
        }
        written.map_err(|e| io_error("write", path, e))?;

        debug!(path = %target.display(), "Document stored");
        Ok(StoredDocument {
            path: path.to_string(),
            size: bytes.len() as u64,
            content_type: content_type.to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, PortError> {
        let target = self.resolve(path)?;
        fs::read(&target).await.map_err(|e| io_error("read", path, e))
    }

    async fn delete(&self, path: &str) -> Result<(), PortError> {
        let target = self.resolve(path)?;
        fs::remove_file(&target)
            .await
            .map_err(|e| io_error("delete", path, e))
    }
}
