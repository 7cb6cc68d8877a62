//! HTML parser for extracting links, title and text
//!
//! This module turns a fetched page body into:
//! - The raw `href` of every `<a>` tag (resolution happens in the url module)
//! - The page title, `"Untitled"` when the document has none
//! - The visible text of the document

use scraper::{Html, Node, Selector};

/// Title used when a page has no usable `<title>`
pub const DEFAULT_TITLE: &str = "Untitled";

/// Elements whose text content is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Title and text extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub title: String,
    pub text: String,
}

/// HTML/text extraction collaborator
pub trait PageExtractor: Send + Sync {
    /// Extracts title and plain text from a page body
    fn extract(&self, body: &[u8]) -> ExtractedPage;

    /// Returns the raw `href` values of the page's anchors, in document order
    fn links(&self, body: &[u8]) -> Vec<String>;
}

/// [`PageExtractor`] built on the scraper crate
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl PageExtractor for HtmlExtractor {
    fn extract(&self, body: &[u8]) -> ExtractedPage {
        let document = parse_body(body);
        ExtractedPage {
            title: extract_title(&document).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            text: extract_text(&document),
        }
    }

    fn links(&self, body: &[u8]) -> Vec<String> {
        extract_hrefs(&parse_body(body))
    }
}

fn parse_body(body: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(body))
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects every text node outside of hidden elements
fn extract_text(document: &Html) -> String {
    let mut text = String::new();

    for node in document.root_element().descendants() {
        let Node::Text(chunk) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map_or(false, |element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }

    text
}

/// Extracts the href of every anchor in document order
fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
