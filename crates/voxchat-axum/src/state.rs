//! Shared application state type.

use std::sync::Arc;

use crate::upstream::UpstreamSpeech;

/// Services needed by the API handlers.
pub struct AxumContext {
    /// Speech API that `/api/tts` forwards to.
    pub upstream: Arc<dyn UpstreamSpeech>,
}

/// Application state shared across all handlers.
pub type AppState = Arc<AxumContext>;
