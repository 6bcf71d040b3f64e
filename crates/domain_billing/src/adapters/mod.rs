//! Billing adapters
//!
//! - `print_service`: renders invoice HTML to PDF through an HTTP print service
//! - `local_fs`: stores documents under a directory on the local filesystem

pub mod print_service;
pub mod local_fs;

pub use print_service::{PrintServiceConfig, PrintServiceRenderer};
pub use local_fs::LocalFsDocumentStore;
