//! Test utilities for featurescript
//!
//! Helpers shared by unit and integration tests: one-time logging setup and
//! fixtures for spec catalogs and configuration documents.
//!
//! # Example
//!
//! ```rust,ignore
//! use featurescript::resolver::PathResolver;
//! use featurescript::test_utils::{CatalogFixture, ConfigFixture};
//!
//! let catalog = CatalogFixture::logging().catalog().unwrap();
//! let tree = ConfigFixture::logging().tree().unwrap();
//! let features = PathResolver::new(&catalog).resolve(&tree).unwrap();
//! assert_eq!(features.len(), 4);
//! ```

pub mod fixtures;

pub use fixtures::{CatalogFixture, ConfigFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run without a subscriber.
///
/// ```bash
/// RUST_LOG=featurescript=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
