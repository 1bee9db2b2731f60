//! Utility functions and helpers.
//!
//! # Submodules
//!
//! - [`paths`]: Path manipulation (absolute paths, lexical cleaning,
//!   link target resolution, relative paths)

pub mod paths;
