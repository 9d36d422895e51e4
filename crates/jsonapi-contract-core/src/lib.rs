//! # jsonapi-contract-core — Foundational Types for Response Contract Checks
//!
//! Shared vocabulary for the response assertions in `jsonapi-contract`:
//! what can go wrong, which clause a failure points at, the literals the
//! checks compare against, and the status-to-title error catalog.
//!
//! ## Crate Policy
//!
//! - No dependencies on other workspace crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod catalog;
pub mod clause;
pub mod config;
pub mod error;
pub mod load;

// Re-export primary types for ergonomic imports.
pub use catalog::ErrorCatalog;
pub use clause::Clause;
pub use config::{ContractConfig, JSONAPI_VERSION, REQUIRED_META, SELF_LINK_PLACEHOLDER};
pub use error::{ContractError, LoadError, Violation};
pub use load::SourceFormat;
