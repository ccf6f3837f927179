mod commands;

use clap::{Parser, Subcommand};
use commands::{build, serve};
use tracing::error;
use std::error::Error;
use stubserver::{config::settings::Settings, logging};

#[derive(Parser)]
#[command(name = "stubserver")]
#[command(author, version, about = "Mock HTTP server driven by a directory of JSON endpoint files")]
struct Cli {
    /// Only log to the console, skip the log file under LOG_PATH
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    async fn run(self) -> Result<(), Box<dyn Error>> {
        match self.command {
            Commands::Build(args) => build::run(args).await,
            Commands::Serve(args) => serve::run(args).await,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an endpoints directory and write its catalogue
    Build(commands::build::BuildArgs),

    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_dir = (!cli.no_log_file).then(Settings::log_dir_from_env);
    if let Err(e) = logging::init(log_dir.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli.run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
