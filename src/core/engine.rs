use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::builders::classifier::target_key;
use crate::builders::fetcher::{SnippetFetcher, SnippetOrigin, SnippetTransport};
use crate::builders::filter::PathFilter;
use crate::builders::merger::IgnoreFileWriter;
use crate::builders::reporter::Reporter;
use crate::core::config::SnippetConfig;

/// Name of the generated file, created at the root of the scanned tree.
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Everything the scan phase gathered.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Configured keys found in the tree, in the order they were first seen.
    pub matched_keys: Vec<String>,
    /// Raw snippet lines of every matched key, concatenated.
    pub lines: Vec<String>,
    pub fetched: usize,
    pub cache_hits: usize,
    pub failures: usize,
}

/// Summary of a complete run.
#[derive(Debug)]
pub struct GenerationReport {
    pub matched_keys: Vec<String>,
    pub fetched: usize,
    pub cache_hits: usize,
    pub failures: usize,
    /// The final sanitized, sorted content.
    pub lines: BTreeSet<String>,
    /// `false` for dry runs.
    pub written: bool,
    pub elapsed: Duration,
}

/// Drives one generation run over a directory tree.
///
/// The engine owns the runtime config (and therefore the snippet cache) for
/// the duration of the run. Network access and logging go through the
/// transport and reporter it was built with.
pub struct GeneratorEngine<'a> {
    root: PathBuf,
    output: PathBuf,
    config: SnippetConfig,
    transport: &'a dyn SnippetTransport,
    reporter: &'a dyn Reporter,
}

impl<'a> GeneratorEngine<'a> {
    /// Constructs an engine for the tree at `root`.
    ///
    /// # Arguments
    /// * `root`: The folder to scan. The output is `root/.gitignore`.
    /// * `config`: The expanded type -> URL mapping; the engine takes ownership
    ///   of it and its cache for the run.
    /// * `transport`: Used for every cache miss.
    /// * `reporter`: Receives all progress and warning lines.
    pub fn new(
        root: PathBuf,
        config: SnippetConfig,
        transport: &'a dyn SnippetTransport,
        reporter: &'a dyn Reporter,
    ) -> Self {
        let output = root.join(IGNORE_FILE_NAME);
        Self {
            root,
            output,
            config,
            transport,
            reporter,
        }
    }

    /// The runtime config, including whatever the run has cached so far.
    pub fn config(&self) -> &SnippetConfig {
        &self.config
    }

    /// Walks the tree and collects the snippet lines of every configured key found.
    ///
    /// Each key is resolved at most once per scan. Walk order does not matter
    /// since the merged result is deduplicated and sorted. Unreadable entries
    /// are reported and skipped.
    pub fn scan(&mut self) -> ScanResult {
        self.reporter.info(None, "Scanning files...");

        let filter = PathFilter::new(&self.root, &self.output);
        let fetcher = SnippetFetcher::new(self.transport, self.reporter);
        let mut processed = HashSet::new();
        let mut result = ScanResult::default();

        let mut walker = WalkDir::new(&self.root).min_depth(1).into_iter();
        while let Some(next) = walker.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    self.reporter.warn(None, &format!("Skipping unreadable entry: {e}"));
                    continue;
                }
            };

            let path = entry.path();

            // The directory itself is still classified below; only its contents are pruned.
            if entry.file_type().is_dir() && PathFilter::is_excluded_dir(path) {
                walker.skip_current_dir();
            }

            if filter.should_skip(path) {
                continue;
            }

            // Follows symlinks: a link to a directory is keyed by its name.
            let key = target_key(path, path.is_dir());
            if processed.contains(&key) || !self.config.contains(&key) {
                continue;
            }

            self.reporter
                .info(Some(&key), &format!("Adding {key} related data to .gitignore..."));
            let snippet = fetcher.fetch(&key, &mut self.config);
            match snippet.origin {
                SnippetOrigin::Network => result.fetched += 1,
                SnippetOrigin::Cache => result.cache_hits += 1,
                SnippetOrigin::Failed => result.failures += 1,
                SnippetOrigin::NotConfigured => {}
            }

            result.lines.extend(snippet.lines);
            result.matched_keys.push(key.clone());
            processed.insert(key);
        }

        result
    }

    /// Runs the full pipeline: scan, merge with the existing file, write.
    ///
    /// With `dry_run` set the merged result is computed and returned but the
    /// file on disk is left untouched.
    pub fn generate(&mut self, dry_run: bool) -> Result<GenerationReport> {
        let start = Instant::now();
        let scan = self.scan();

        self.reporter.info(None, "Dumping .gitignore...");
        let writer = IgnoreFileWriter::new(&self.output);
        if writer.exists() {
            self.reporter
                .info(None, "The .gitignore already exists. Merging with the new data...");
        }

        let lines = writer.merge(scan.lines)?;
        if dry_run {
            self.reporter.info(
                None,
                &format!("Dry run: {} lines would be written to .gitignore", lines.len()),
            );
        } else {
            self.reporter
                .info(None, &format!("Writing {} lines to .gitignore...", lines.len()));
            writer.write(&lines)?;
        }

        Ok(GenerationReport {
            matched_keys: scan.matched_keys,
            fetched: scan.fetched,
            cache_hits: scan.cache_hits,
            failures: scan.failures,
            lines,
            written: !dry_run,
            elapsed: start.elapsed(),
        })
    }
}
