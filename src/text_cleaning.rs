//! # Text Cleaning Module
//!
//! Turns raw channel input into the plain text embedded in a prompt.
//!
//! ## Features
//!
//! - HTML cleaning: drops `<script>`/`<style>` blocks and comments, strips the
//!   remaining tags and collapses whitespace into single spaces
//! - PDF text normalization: collapses runs of line breaks and trims the result

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref SCRIPT_BLOCK: Regex =
        Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Script pattern should be valid");
    static ref STYLE_BLOCK: Regex =
        Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("Style pattern should be valid");
    static ref COMMENT_BLOCK: Regex =
        Regex::new(r"(?s)<!--.*?-->").expect("Comment pattern should be valid");
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]+>").expect("Tag pattern should be valid");
    static ref LINE_BREAKS: Regex =
        Regex::new(r"(?:\r?\n)+").expect("Line break pattern should be valid");
}

/// Reduce an HTML document to its visible words separated by single spaces
///
/// # Examples
///
/// ```rust
/// use recipeasy_ingest::text_cleaning::clean_html;
///
/// let html = "<html><style>p{}</style><body><h1>Pancakes</h1>\n<p>2 eggs</p></body></html>";
/// assert_eq!(clean_html(html), "Pancakes 2 eggs");
/// ```
pub fn clean_html(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, " ");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, " ");
    let without_comments = COMMENT_BLOCK.replace_all(&without_styles, " ");
    // Tags become spaces so adjacent block elements don't glue their words together
    let without_tags = ANY_TAG.replace_all(&without_comments, " ");

    let cleaned = without_tags.split_whitespace().collect::<Vec<&str>>().join(" ");

    debug!(
        "Cleaned HTML from {} to {} characters",
        html.len(),
        cleaned.len()
    );
    cleaned
}

/// Collapse consecutive line breaks and trim surrounding whitespace
pub fn normalize_pdf_text(text: &str) -> String {
    LINE_BREAKS.replace_all(text, "\n").trim().to_string()
}
