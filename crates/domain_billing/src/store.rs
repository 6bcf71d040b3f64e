//! Document storage port
//!
//! Rendered invoices are kept in object storage under slash-separated paths
//! such as `invoices/{userId}/{invoiceNumber}.pdf`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{DomainPort, HealthCheckable, PortError};

/// Location and size of a stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub path: String,
    pub size: u64,
    pub content_type: String,
}

/// Port for document object storage
#[async_trait]
pub trait DocumentStore: DomainPort + HealthCheckable {
    /// Writes `bytes` at a new `path`
    ///
    /// Fails with `PortError::Conflict` when a document already exists there;
    /// stored documents are never replaced.
    async fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<StoredDocument, PortError>;

    async fn get(&self, path: &str) -> Result<Vec<u8>, PortError>;

    async fn delete(&self, path: &str) -> Result<(), PortError>;
}

/// Rejects paths that are empty, absolute or climb out of the store root
pub fn check_path(path: &str) -> Result<(), PortError> {
    let valid = !path.is_empty()
        && !path.starts_with('/')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if valid {
        Ok(())
    } else {
        Err(PortError::validation_field(format!("Invalid document path: {}", path), "path"))
    }
}

/// Mock implementation of DocumentStore for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    #[derive(Debug, Default, Clone)]
    pub struct MockDocumentStore {
        documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    }

    impl MockDocumentStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn paths(&self) -> Vec<String> {
            let mut paths: Vec<String> = self.documents.read().await.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl DomainPort for MockDocumentStore {}

    #[async_trait]
    impl HealthCheckable for MockDocumentStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-document-store")
        }
    }

    #[async_trait]
    impl DocumentStore for MockDocumentStore {
        async fn put(&self, path: &str, bytes: &[u8], content_type: &str) -> Result<StoredDocument, PortError> {
            check_path(path)?;
            let mut documents = self.documents.write().await;
            if documents.contains_key(path) {
                return Err(PortError::conflict(format!("Document {} already exists", path)));
            }
            documents.insert(path.to_string(), bytes.to_vec());
            Ok(StoredDocument {
                path: path.to_string(),
                size: bytes.len() as u64,
                content_type: content_type.to_string(),
            })
        }

        async fn get(&self, path: &str) -> Result<Vec<u8>, PortError> {
            self.documents
                .read()
                .await
                .get(path)
                .cloned()
                .ok_or_else(|| PortError::not_found("Document", path))
        }

        async fn delete(&self, path: &str) -> Result<(), PortError> {
            self.documents
                .write()
                .await
                .remove(path)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Document", path))
        }
    }
}
