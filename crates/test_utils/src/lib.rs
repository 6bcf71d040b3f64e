//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! field operations core test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built catalog records and instants
//! - `builders`: Builder patterns for requests and drafts
//! - `database`: PostgreSQL container management for integration tests
//! - `assertions`: Assertion helpers for prices and port errors
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
