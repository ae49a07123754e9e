//! Core types for featurescript
//!
//! This module holds the error taxonomy shared by every stage of the
//! pipeline (catalog loading, path resolution, dependency ordering and script
//! writing) together with the CLI-facing error presentation helpers.
//!
//! - [`FeatureScriptError`] - Enumerated error kinds
//! - [`ErrorContext`] - User-friendly wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to the user-friendly format

pub mod error;

pub use error::{ErrorContext, FeatureScriptError, Result, user_friendly_error};
