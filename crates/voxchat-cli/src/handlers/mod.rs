//! Command handlers.

pub mod input;
pub mod render;
pub mod serve;
pub mod speak;
