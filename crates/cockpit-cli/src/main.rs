mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    burnout::BurnoutSubcommand, config::ConfigSubcommand, project::ProjectSubcommand,
    run::RunSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cockpit",
    about = "Executive cockpit rules: run approval gating and portfolio WIP limits",
    version,
    propagate_version = true
)]
struct Cli {
    /// Cockpit root (default: auto-detect from .cockpit/ or .git/)
    #[arg(long, global = true, env = "COCKPIT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .cockpit/ with a default config and an empty portfolio
    Init,

    /// Inspect run types and gate run requests
    Run {
        #[command(subcommand)]
        subcommand: RunSubcommand,
    },

    /// Manage tracked projects
    Project {
        #[command(subcommand)]
        subcommand: ProjectSubcommand,
    },

    /// Show the next open checkpoints across active projects
    Deadlines {
        /// Maximum number of checkpoints to show
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Record and assess burnout metrics
    Burnout {
        #[command(subcommand)]
        subcommand: BurnoutSubcommand,
    },

    /// Validate the cockpit configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved cockpit root");

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Run { subcommand } => cmd::run::run(&root, subcommand, cli.json),
        Commands::Project { subcommand } => cmd::project::run(&root, subcommand, cli.json),
        Commands::Deadlines { limit } => cmd::deadlines::run(&root, limit, cli.json),
        Commands::Burnout { subcommand } => cmd::burnout::run(&root, subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
