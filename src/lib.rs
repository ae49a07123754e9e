//! featurescript - declarative feature resolution for server management scripts
//!
//! Turns a nested installation configuration document into an ordered list of
//! idempotent management commands, driven by a catalog of reusable feature
//! specs.
//!
//! # Architecture Overview
//!
//! ```text
//! catalog dir ──► SpecCatalog ─┐
//!                              ├─► PathResolver ─► DependencyOrderer ─► Script ─► ScriptWriter
//! config.yml ──► ConfigDocument┘
//! ```
//!
//! 1. The [`catalog`] loads one spec record per feature type.
//! 2. The [`resolver`] walks the configuration tree, matching keys to dotted
//!    spec names and binding identifier values, and builds a
//!    [`ResolvedFeature`](resolver::ResolvedFeature) per concrete instance.
//!    [`capability`] templates are expanded against each feature's values.
//! 3. The [`DependencyOrderer`](resolver::DependencyOrderer) places capability
//!    providers and referenced specs before the features that need them.
//! 4. The [`script`] module renders the command blocks and writes them out.
//!
//! # Core Modules
//!
//! - [`capability`] - Capability template parsing and cartesian expansion
//! - [`catalog`] - Spec records and the immutable spec catalog
//! - [`cli`] - Command-line interface
//! - [`config`] - Tool configuration (`~/.featurescript/config.toml`)
//! - [`core`] - Error types and user-facing error rendering
//! - [`models`] - Configuration tree values and document loading
//! - [`resolver`] - Tree walking, command emission and dependency ordering
//! - [`script`] - Script rendering and writers
//! - [`utils`] - Atomic file writes and path expansion
//!
//! # Example
//!
//! ```rust,no_run
//! use featurescript::catalog::SpecCatalog;
//! use featurescript::models::ConfigDocument;
//! use featurescript::resolver::resolve_and_order;
//! use featurescript::script::{Script, ScriptOptions};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let catalog = SpecCatalog::load(Path::new("feature-specs"))?;
//! let document = ConfigDocument::load(Path::new("wildfly.yml"))?;
//! let ordered = resolve_and_order(&catalog, &[document.tree])?;
//! print!("{}", Script::from_features(&ordered, ScriptOptions::default()).render());
//! # Ok(())
//! # }
//! ```

// Resolution pipeline
pub mod capability;
pub mod catalog;
pub mod models;
pub mod resolver;
pub mod script;

// Command line and supporting modules
pub mod cli;
pub mod config;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
