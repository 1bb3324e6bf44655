mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::employee::EmployeeSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Employee records with validated create and edit forms",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .roster/ or .git/)
    #[arg(long, global = true, env = "ROSTER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .roster/ with a default config and an empty record file
    Init,

    /// Read and delete stored employees
    Employee {
        #[command(subcommand)]
        subcommand: EmployeeSubcommand,
    },

    /// Run an employee YAML file through the form rules and print every
    /// validation message
    Check {
        /// Path to a YAML employee record
        file: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Port to listen on (default: server.port from config)
        #[arg(long)]
        port: Option<u16>,

        /// Open the home view in a browser
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Employee { subcommand } => cmd::employee::run(&root, subcommand, cli.json),
        Commands::Check { file } => cmd::check::run(&root, &file, cli.json),
        Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
