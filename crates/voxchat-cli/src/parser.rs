//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Render chat replies and speak them aloud.
#[derive(Parser)]
#[command(name = "voxchat")]
#[command(about = "Render chat replies as HTML and play them as synthesized speech")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_reads_stdin_without_a_file() {
        let cli = Cli::parse_from(["voxchat", "render"]);
        assert!(matches!(cli.command, Commands::Render { file: None }));
    }

    #[test]
    fn speak_takes_file_and_voice() {
        let cli = Cli::parse_from([
            "voxchat",
            "-v",
            "speak",
            "reply.md",
            "--voice",
            "playai-tts-arabic|Amira-PlayAI",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Speak { file, voice } => {
                assert_eq!(file, Some(PathBuf::from("reply.md")));
                assert_eq!(voice.as_deref(), Some("playai-tts-arabic|Amira-PlayAI"));
            }
            _ => panic!("expected speak"),
        }
    }

    #[test]
    fn serve_port_is_optional() {
        let cli = Cli::parse_from(["voxchat", "serve", "--port", "8080"]);
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), .. }));

        let cli = Cli::parse_from(["voxchat", "serve"]);
        match cli.command {
            Commands::Serve { port, cors_origins } => {
                assert_eq!(port, None);
                assert!(cors_origins.is_empty());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn serve_splits_cors_origins_on_commas() {
        let cli = Cli::parse_from([
            "voxchat",
            "serve",
            "--cors-origins",
            "http://localhost:3000,https://chat.example",
        ]);
        match cli.command {
            Commands::Serve { cors_origins, .. } => assert_eq!(
                cors_origins,
                vec!["http://localhost:3000".to_string(), "https://chat.example".to_string()]
            ),
            _ => panic!("expected serve"),
        }
    }
}
