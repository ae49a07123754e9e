//! Integration test suite for featurescript
//!
//! End-to-end tests that run the `featurescript` binary against catalogs and
//! configuration documents written to temporary directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **generate**: Script generation to stdout and files
//! - **validate**: Validation summaries in text and JSON
//! - **specs**: Catalog listing
//! - **error_scenarios**: Exit codes and user-facing error messages

mod common;

mod error_scenarios;
mod generate;
mod specs;
mod validate;
