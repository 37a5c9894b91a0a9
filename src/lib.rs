//! Generates a `.gitignore` for a directory tree.
//!
//! The tree is scanned for the file types it contains, each type is mapped to
//! a remote ignore-pattern snippet through the config file, and the snippets
//! are merged with any existing `.gitignore` before being written back sorted
//! and deduplicated.
pub mod builders;
pub mod core;
pub mod utils;

#[cfg(test)]
mod tests;
