//! Reading message text from a file or stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read all of `file`, or all of stdin when `file` is `None`.
pub fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "**hi**").unwrap();
        assert_eq!(read_input(Some(file.path())).unwrap(), "**hi**");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input(Some(Path::new("/nonexistent/voxchat/reply.md"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/voxchat/reply.md"));
    }
}
