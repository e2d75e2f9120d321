//! chartfetch: resolve Helm charts from Maven repositories.

mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use commands::resolve::ResolveOptions;

/// Environment variable holding a log filter, e.g. `chartfetch_maven=debug`.
const LOG_ENV: &str = "CHARTFETCH_LOG";

#[derive(Parser)]
#[command(name = "chartfetch", version, about = "Resolve Helm charts from Maven repositories")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a chart by coordinates and summarize it
    Resolve {
        /// Coordinates: group:name[:packaging[:classifier]]
        coordinates: String,
        /// Chart version (default: LATEST)
        #[arg(long)]
        version: Option<String>,
        /// Config file (default: nearest chartfetch.toml)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Local repository directory (default: ~/.m2/repository)
        #[arg(long)]
        local_repo: Option<PathBuf>,
        /// Extra remote repository as ID=URL, searched after configured ones
        #[arg(long = "remote", value_name = "ID=URL")]
        remotes: Vec<String>,
        /// Do not contact remote repositories
        #[arg(long)]
        offline: bool,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Decode a chart archive from disk
    Inspect {
        /// Archive file
        file: PathBuf,
        /// Packaging tag (default: inferred from the file name)
        #[arg(long)]
        packaging: Option<String>,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
    /// Parse coordinates and print the resulting artifact
    Coordinates {
        /// Coordinates: group:name[:packaging[:classifier]]
        coordinates: String,
        /// Chart version (default: LATEST)
        #[arg(long)]
        version: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr. `CHARTFETCH_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Resolve {
            coordinates,
            version,
            config,
            local_repo,
            remotes,
            offline,
            format,
        } => {
            let cwd = std::env::current_dir()?;
            let options = ResolveOptions {
                coordinates: &coordinates,
                version: version.as_deref(),
                local_repository: local_repo.as_deref(),
                remotes: &remotes,
                offline,
            };
            commands::resolve::run(&cwd, config.as_deref(), &options, format.as_deref())
        }

        Commands::Inspect {
            file,
            packaging,
            format,
        } => commands::inspect::run(&file, packaging.as_deref(), format.as_deref()),

        Commands::Coordinates {
            coordinates,
            version,
        } => commands::coordinates::run(&coordinates, version.as_deref()),
    }
}
