// This file is the module declaration file for the `builders` module.
// It declares and makes public all the sub-modules within the `src/builders`
// directory. Each one implements a single stage of the generation pipeline.

// `classifier` module:
// Turns a filesystem entry into its target key: the directory or file name
// for directories and extensionless files, the last extension otherwise.
pub mod classifier;

// `fetcher` module:
// Resolves the snippet of a target key. Serves it from the in-memory cache
// when possible and otherwise downloads it through a `SnippetTransport`
// (the `reqwest`-backed `HttpTransport` in production). Network failures are
// soft: they are reported and produce no lines.
pub mod fetcher;

// `filter` module:
// Decides which entries of the scanned tree are relevant. Keeps the scan out
// of `.git`, dependency, build and IDE directories and away from the output file.
pub mod filter;

// `merger` module:
// Merges the collected lines with any existing `.gitignore`, strips comments
// and blanks, deduplicates, sorts and writes the final file.
pub mod merger;

// `reporter` module:
// The line-oriented console logger. Every call names the target key it
// relates to, so no global "current target" state exists.
pub mod reporter;

// `validator` module:
// Checks the loaded config for missing or non-HTTP URLs and for aliases
// claimed by several groups.
pub mod validator;
