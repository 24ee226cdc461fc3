//! Structural extraction over parsed HTML
//!
//! Documents are parsed with `scraper` and queried with compiled CSS
//! selectors ([`StructuralQuery`]). Callers only ever see [`ElementHandle`],
//! a narrow view exposing text content, attribute lookup and ordered child
//! elements.

use crate::{HarvestError, Result};
use scraper::{ElementRef, Html, Selector};
use std::fmt;

/// A compiled positional query (tag names, attributes, child position)
#[derive(Clone)]
pub struct StructuralQuery {
    source: String,
    selector: Selector,
}

impl StructuralQuery {
    /// Compiles a query; a query that does not compile is a malformed-document error
    ///
    /// # Example
    ///
    /// ```
    /// use blog_harvester::crawler::StructuralQuery;
    ///
    /// assert!(StructuralQuery::parse("div.archive > article:nth-child(2)").is_ok());
    /// assert!(StructuralQuery::parse("div >").is_err());
    /// ```
    pub fn parse(source: &str) -> Result<Self> {
        let selector = Selector::parse(source).map_err(|e| {
            HarvestError::MalformedDocument(format!("invalid query '{}': {}", source, e))
        })?;

        Ok(Self {
            source: source.to_string(),
            selector,
        })
    }

    /// The query text as written in configuration
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for StructuralQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StructuralQuery").field(&self.source).finish()
    }
}

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses raw page content into a navigable tree
    ///
    /// Parsing is lenient the way browsers are; the only content rejected is
    /// an empty (or whitespace-only) body, which has no tree to query.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(HarvestError::MalformedDocument(
                "document is empty".to_string(),
            ));
        }

        Ok(Self {
            html: Html::parse_document(raw),
        })
    }

    /// Returns every element matching the query, in document order
    pub fn select<'a>(&'a self, query: &StructuralQuery) -> Vec<ElementHandle<'a>> {
        self.html
            .select(&query.selector)
            .map(ElementHandle::new)
            .collect()
    }
}

/// Read-only view of one element in a parsed [`Document`]
#[derive(Clone, Copy)]
pub struct ElementHandle<'a> {
    element: ElementRef<'a>,
}

impl<'a> ElementHandle<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Lowercase tag name
    pub fn tag_name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Concatenated text of the whole subtree, whitespace preserved
    pub fn text_content(&self) -> String {
        self.element.text().collect()
    }

    /// Subtree text with runs of whitespace collapsed and the ends trimmed
    pub fn normalized_text(&self) -> String {
        self.element
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Value of a named attribute
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Immediate child elements in order; text and comment nodes are skipped
    pub fn children(&self) -> Vec<ElementHandle<'a>> {
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(ElementHandle::new)
            .collect()
    }

    /// Descendants of this element matching the query, in document order
    pub fn select(&self, query: &StructuralQuery) -> Vec<ElementHandle<'a>> {
        let this = self.element.id();
        self.element
            .select(&query.selector)
            .filter(|found| found.id() != this)
            .map(ElementHandle::new)
            .collect()
    }
}

impl fmt::Debug for ElementHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementHandle")
            .field("tag", &self.tag_name())
            .finish()
    }
}

/// Concatenates the text of every element matching `query` in `raw`
///
/// An empty body yields an empty string rather than an error: callers use
/// this for article bodies, where "nothing fetched" means "no text".
pub fn extract_text(raw: &str, query: &StructuralQuery) -> Result<String> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }

    let document = Document::parse(raw)?;
    Ok(document
        .select(query)
        .iter()
        .map(ElementHandle::text_content)
        .collect())
}
