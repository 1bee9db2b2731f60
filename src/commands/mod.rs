//! Command implementations.
//!
//! lnka has a single command: interactively link files from the source
//! directory into the target directory.

pub mod link;
