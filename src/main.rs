//! Scans a folder for the file types it contains and builds its `.gitignore`
//! from the snippets configured for those types, keeping whatever the
//! existing `.gitignore` already lists.
use clap::Parser;
use gitignore_generator::builders::reporter::{ConsoleReporter, Reporter};
use gitignore_generator::utils::{self, RunOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitignore-generator")]
#[command(version)]
#[command(about = "Generate a .gitignore from the file types found in a folder")]
struct Cli {
    /// The folder to scan. Its `.gitignore` is created or merged in place.
    /// Extra values are collected so the run can reject them with its own message.
    #[arg(value_name = "TARGET")]
    targets: Vec<PathBuf>,

    /// Type -> URL mapping file (JSON, TOML or YAML). Defaults to
    /// `config.json` next to the executable.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the merged result instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Validate the config file and exit
    #[arg(long)]
    check_config: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        Self {
            targets: cli.targets,
            config: cli.config,
            dry_run: cli.dry_run,
            check_config: cli.check_config,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let reporter = ConsoleReporter::new(cli.quiet);

    if let Err(e) = utils::run(cli.into(), &reporter) {
        reporter.error(&format!("{e:#}"));
        std::process::exit(-1);
    }
}
