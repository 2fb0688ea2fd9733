//! CLI entry point - the composition root.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxchat_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so `render` output stays clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render { file } => handlers::render::execute(file.as_deref()),
        Commands::Speak { file, voice } => {
            handlers::speak::execute(file.as_deref(), voice.as_deref()).await
        }
        Commands::Serve { port, cors_origins } => {
            handlers::serve::execute(port, cors_origins).await
        }
    }
}
