//! Markdown rendering for content bodies

use pulldown_cmark::{html, Options, Parser};

/// Render markdown to HTML
///
/// Bodies are stored as markdown in the content directory but served as
/// HTML, so rendering happens once at load time.
pub fn render(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_SMART_PUNCTUATION;
    let parser = Parser::new_ext(markdown, options);

    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, parser);
    out
}
