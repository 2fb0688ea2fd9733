//! Subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Render a markdown reply to an HTML fragment
    Render {
        /// File to read (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Synthesize a reply and play it until it ends (Ctrl-C stops)
    Speak {
        /// File to read (stdin when omitted)
        file: Option<PathBuf>,
        /// Voice as model|voice, e.g. "playai-tts|Fritz-PlayAI"
        #[arg(long)]
        voice: Option<String>,
    },

    /// Run the web server (/api/render, /api/tts)
    Serve {
        /// Port to listen on (overrides VOXCHAT_PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Comma-separated CORS origins (overrides VOXCHAT_CORS_ORIGINS)
        #[arg(long, value_delimiter = ',')]
        cors_origins: Vec<String>,
    },
}
