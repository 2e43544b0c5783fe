//! # Input Sources Module
//!
//! Collects channel input for the command-line front end: downloading a recipe
//! web page and reading local text files (or standard input).

use anyhow::{bail, Context, Result};
use log::info;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Path argument meaning "read standard input"
pub const STDIN_PATH: &str = "-";

/// Download the HTML of a recipe page
pub async fn fetch_html(url: &str) -> Result<String> {
    info!("Fetching recipe page: {url}");

    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch {url}"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Fetching {url} returned HTTP {status}");
    }

    let html = response
        .text()
        .await
        .with_context(|| format!("Failed to read the body of {url}"))?;

    info!("Fetched {} characters of HTML", html.len());
    Ok(html)
}

/// Read UTF-8 text from `path`, or from standard input when `path` is "-"
pub fn read_text_input(path: &Path) -> Result<String> {
    let text = if path.as_os_str() == STDIN_PATH {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read standard input")?;
        buffer
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    if text.trim().is_empty() {
        bail!("Input {} is empty", path.display());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_text_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Pancakes\n2 eggs").unwrap();

        let text = read_text_input(file.path()).unwrap();
        assert_eq!(text, "Pancakes\n2 eggs\n");
    }

    #[test]
    fn test_read_text_input_rejects_blank_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "  \n\n").unwrap();
        assert!(read_text_input(file.path()).is_err());
    }

    #[test]
    fn test_read_text_input_missing_file() {
        let err = read_text_input(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_fetch_html_rejects_invalid_url() {
        assert!(fetch_html("not a url").await.is_err());
    }
}
