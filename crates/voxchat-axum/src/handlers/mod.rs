//! HTTP request handlers for the Axum web server.

pub mod render;
pub mod tts;
