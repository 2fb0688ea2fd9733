//! Render command handler.

use std::path::Path;

use anyhow::Result;

use super::input::read_input;

/// Print the HTML rendering of `file` (or stdin).
pub fn execute(file: Option<&Path>) -> Result<()> {
    let text = read_input(file)?;
    println!("{}", voxchat_core::render(&text));
    Ok(())
}
