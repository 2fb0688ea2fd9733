#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings; these are used by tests/
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tower as _;

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod upstream;

pub use config::{CorsConfig, ServerConfig};
pub use error::HttpError;
pub use routes::create_router;
pub use server::{bootstrap, start_server};
pub use state::{AppState, AxumContext};
pub use upstream::{GroqSpeechClient, SpeechPayload, UpstreamError, UpstreamSpeech};
