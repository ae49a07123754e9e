//! Error handling for featurescript
//!
//! This module provides the typed error enum used by the resolution pipeline and
//! the user-friendly error reporting used by the CLI. The error system follows
//! two principles:
//! 1. **Strongly-typed errors** so callers can match on the failure kind
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Catalog**: [`FeatureScriptError::CatalogLoad`] for malformed spec records
//! - **Resolution**: [`FeatureScriptError::InvalidPath`] and
//!   [`FeatureScriptError::DuplicateDeclaration`] for configuration trees that do
//!   not match the catalog
//! - **Ordering**: [`FeatureScriptError::CyclicDependency`] when no valid order exists
//! - **Input**: [`FeatureScriptError::ConfigParse`], [`FeatureScriptError::ConfigError`]
//!   and the wrapped I/O, TOML and YAML errors
//!
//! Every error is fatal to the transform: the pipeline is all-or-nothing and no
//! partial script is ever produced.
//!
//! # Examples
//!
//! ```rust,no_run
//! use featurescript::core::{FeatureScriptError, user_friendly_error};
//!
//! let error = FeatureScriptError::InvalidPath {
//!     path: "subsystem.logging.level".to_string(),
//!     reason: "Invalid element level for subsystem.logging".to_string(),
//! };
//! let context = user_friendly_error(anyhow::Error::from(error));
//! context.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for featurescript operations.
#[derive(Error, Debug, Clone)]
pub enum FeatureScriptError {
    /// A spec record could not be parsed or references an undeclared parameter.
    #[error("Failed to load feature spec from {file}: {reason}")]
    CatalogLoad {
        /// Path of the offending record (or the spec name for in-memory catalogs)
        file: String,
        /// Why the record was rejected
        reason: String,
    },

    /// The configuration structure does not match any known spec.
    ///
    /// Raised when a leaf value appears where more structure was expected, when
    /// an element below a resolved feature is neither a declared parameter nor a
    /// known sub-feature, or when identifier matching reaches an unresolvable
    /// state.
    #[error("Invalid configuration path '{path}': {reason}")]
    InvalidPath {
        /// Dotted path of the offending element
        path: String,
        /// Description of the structural violation
        reason: String,
    },

    /// A feature path that must be unique was declared more than once.
    #[error("Feature '{path}' is declared more than once")]
    DuplicateDeclaration {
        /// Resolved path declared twice
        path: String,
    },

    /// Capability or feature-reference dependencies form a cycle.
    #[error("Circular dependency detected: {chain}")]
    CyclicDependency {
        /// Human readable description of the features involved
        chain: String,
    },

    /// The configuration document could not be turned into a feature tree.
    #[error("Invalid configuration document {file}: {reason}")]
    ConfigParse {
        /// Document path, or `<memory>` for in-memory documents
        file: String,
        /// Specific reason for the failure
        reason: String,
    },

    /// Tool configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(String),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl From<std::io::Error> for FeatureScriptError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<toml::de::Error> for FeatureScriptError {
    fn from(error: toml::de::Error) -> Self {
        Self::Toml(error.to_string())
    }
}

impl From<serde_yaml::Error> for FeatureScriptError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Yaml(error.to_string())
    }
}

impl FeatureScriptError {
    /// Shorthand for [`FeatureScriptError::InvalidPath`].
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`FeatureScriptError::CatalogLoad`].
    pub fn catalog(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CatalogLoad {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used by the resolution pipeline.
pub type Result<T> = std::result::Result<T, FeatureScriptError>;

/// Error wrapper that adds a suggestion and details for terminal display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: FeatureScriptError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: FeatureScriptError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// An [`ErrorContext`] passes through unchanged. [`FeatureScriptError`] variants
/// and [`std::io::Error`] get suggestions; anything else is reported with its
/// full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<ErrorContext>() {
        Ok(context) => return context,
        Err(error) => error,
    };

    if let Some(fs_error) = error.downcast_ref::<FeatureScriptError>() {
        let context = create_error_context(fs_error.clone());
        if context.details.is_none() && error.chain().count() > 1 {
            return context.with_details(error.to_string());
        }
        return context;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        let context = ErrorContext::new(FeatureScriptError::Io(error_chain(&error)));
        return match io_error.kind() {
            std::io::ErrorKind::NotFound => context
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => {
                context.with_suggestion("Check file ownership and permissions")
            }
            _ => context,
        };
    }

    ErrorContext::new(FeatureScriptError::Other {
        message: error_chain(&error),
    })
}

/// Render an error followed by its numbered cause chain.
fn error_chain(error: &anyhow::Error) -> String {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }
    message
}

fn create_error_context(error: FeatureScriptError) -> ErrorContext {
    match &error {
        FeatureScriptError::CatalogLoad {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Check the record's comma-separated lists for empty elements and make sure every \
                 name in op-params, addr-params and [param.*] tables is listed in params",
            )
            .with_details("Each .toml file in the catalog directory describes one feature spec"),
        FeatureScriptError::InvalidPath {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Run 'featurescript specs' to list the feature paths the catalog knows")
            .with_details(
                "Scalars are only allowed for declared parameters of a resolved feature; \
                 everything else must be a nested mapping matching a spec path",
            ),
        FeatureScriptError::DuplicateDeclaration {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Remove one of the declarations; dotted keys and nested keys address the same feature",
        ),
        FeatureScriptError::CyclicDependency {
            ..
        } => ErrorContext::new(error)
            .with_suggestion(
                "Break the cycle by removing a required capability or a feature reference \
                 from one of the listed specs",
            )
            .with_details("No feature in the listed set can be placed before all of the others"),
        FeatureScriptError::ConfigParse {
            ..
        }
        | FeatureScriptError::Yaml(_) => ErrorContext::new(error).with_suggestion(
            "The document must be a single top-level key holding nested mappings, \
             scalars and lists of scalars",
        ),
        FeatureScriptError::Toml(_)
        | FeatureScriptError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and key names"),
        _ => ErrorContext::new(error),
    }
}
