// This file is the module declaration file for the `core` module.
//
// `config` module:
// Reads the type -> URL mapping file (JSON, TOML or YAML), expands the
// `|`-separated alias groups and owns the per-run snippet cache.
pub mod config;

// `engine` module:
// Drives a run: walks the tree, classifies and filters each entry, fetches
// the snippets of newly seen keys and hands everything to the merger.
pub mod engine;
