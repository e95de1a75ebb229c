use std::env;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use habittree_core::DateKey;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "habittree", version, about = "Grow a tree one habit day at a time")]
struct Cli {
    /// Treat this day (YYYY-MM-DD, UTC) as today
    #[arg(long, global = true)]
    today: Option<DateKey>,

    /// Directory holding habittree.db and config.toml
    #[arg(long, global = true, env = "HABITTREE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show leaves, streak and flowers (applies missed-day decay)
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Mark today's habit as done
    Complete {
        #[arg(long)]
        json: bool,
    },
    /// Undo the most recent completion
    Undo {
        #[arg(long)]
        json: bool,
    },
    /// Show or set how many leaves earn a flower
    Threshold {
        /// New threshold; values below 1 are clamped to 1
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },
    /// List recorded completion days
    History {
        #[arg(long)]
        json: bool,
    },
    /// Print leaf and flower placements as JSON
    Layout,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HABITTREE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "habittree=debug,info"
        } else {
            "habittree=info,warn"
        })
    });

    let format = env::var("HABITTREE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "habittree", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = commands::Context::resolve(cli.data_dir, cli.today)?;
    match cli.command {
        Commands::Status { json } => commands::habit::status(&ctx, json),
        Commands::Complete { json } => commands::habit::complete(&ctx, json),
        Commands::Undo { json } => commands::habit::undo(&ctx, json),
        Commands::Threshold { value } => commands::habit::threshold(&ctx, value),
        Commands::History { json } => commands::habit::history(&ctx, json),
        Commands::Layout => commands::habit::layout(&ctx),
        Commands::Config { action } => commands::config::run(&ctx, action),
        Commands::Completions { .. } => Ok(()),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
