//! Utilities shared by the CLI commands
//!
//! - [`fs`] - atomic file writes and directory creation
//! - [`platform`] - home directory lookup and `~`/`$VAR` path expansion

pub mod fs;
pub mod platform;

pub use fs::{atomic_write, ensure_dir, safe_write};
pub use platform::{get_home_dir, resolve_path};
