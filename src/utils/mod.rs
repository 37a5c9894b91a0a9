use anyhow::Result;
use std::path::PathBuf;

use crate::builders::fetcher::HttpTransport;
use crate::builders::merger::render;
use crate::builders::reporter::Reporter;
use crate::builders::validator::{ConfigValidator, StandardValidator};
use crate::core::config::{ConfigManager, ConfigProvider, SnippetConfig};
use crate::core::engine::{GenerationReport, GeneratorEngine};

/// Options collected from the command line.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    /// Every positional argument given. Exactly one is accepted.
    pub targets: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub check_config: bool,
}

/// Checks the target folder argument. Every failure here aborts the run
/// before anything is scanned or written.
///
/// # Arguments
/// * `targets`: The positional arguments, as collected by clap.
///
/// # Returns
/// The single target folder, known to exist and to be a directory.
pub fn validate_target(targets: &[PathBuf]) -> Result<PathBuf> {
    let path = match targets {
        [] => anyhow::bail!("You must inform the target folder."),
        [path] => path.clone(),
        _ => anyhow::bail!("You need to pass only one argument: the target folder."),
    };

    if !path.exists() {
        anyhow::bail!("The target folder does not exist.");
    }

    if !path.is_dir() {
        anyhow::bail!("The target folder is not a directory.");
    }

    Ok(path)
}

fn config_manager(options: &RunOptions) -> Result<ConfigManager> {
    match &options.config {
        Some(path) => Ok(ConfigManager::new(path.clone())),
        None => ConfigManager::at_default_location(),
    }
}

/// Validates the config file and prints the outcome.
pub fn check_config(options: &RunOptions, reporter: &dyn Reporter) -> Result<()> {
    let manager = config_manager(options)?;
    let sources = manager.load_sources()?;
    let issues = StandardValidator::new().validate_config(&sources);

    if issues.is_empty() {
        reporter.info(
            None,
            &format!(
                "✓ Configuration is valid ({} keys in {}).",
                sources.len(),
                manager.get_config_path().display()
            ),
        );
        return Ok(());
    }

    reporter.warn(None, "⚠️  Found issues in configuration:");
    for issue in issues {
        reporter.warn(None, &format!("  - {issue}"));
    }
    anyhow::bail!("Configuration validation failed.");
}

/// Runs one generation: validate arguments, load the config, scan, merge, write.
pub fn generate_gitignore(options: &RunOptions, reporter: &dyn Reporter) -> Result<GenerationReport> {
    reporter.info(None, "Generating .gitignore...");
    let root = validate_target(&options.targets)?;

    let manager = config_manager(options)?;
    let sources = manager.load_sources()?;
    for issue in StandardValidator::new().validate_config(&sources) {
        reporter.warn(None, &format!("Config: {issue}"));
    }

    let transport = HttpTransport::new()?;
    let mut engine = GeneratorEngine::new(
        root,
        SnippetConfig::from_sources(&sources),
        &transport,
        reporter,
    );
    let report = engine.generate(options.dry_run)?;

    if options.dry_run {
        print!("{}", render(&report.lines));
    }

    reporter.info(
        None,
        &format!(
            "Done! {} types matched, {} fetched, {} from cache, {} failed. Elapsed time: {:?}",
            report.matched_keys.len(),
            report.fetched,
            report.cache_hits,
            report.failures,
            report.elapsed
        ),
    );
    Ok(report)
}

/// Entry point used by `main`.
pub fn run(options: RunOptions, reporter: &dyn Reporter) -> Result<()> {
    if options.check_config {
        return check_config(&options, reporter);
    }

    generate_gitignore(&options, reporter)?;
    Ok(())
}
