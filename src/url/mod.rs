//! Link resolution for extracted hrefs
//!
//! Card links on a blog listing are usually site-relative (`/python-web/`), so
//! every href read from a document is resolved against the site's base URL
//! before it is stored.

use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an href against a base URL, producing an absolute http(s) URL
///
/// Rejects:
/// - empty hrefs and fragment-only anchors (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` targets
/// - anything that does not resolve to http or https
///
/// # Examples
///
/// ```
/// use blog_harvester::url::resolve_href;
/// use url::Url;
///
/// let base = Url::parse("https://blog.example.com").unwrap();
/// let url = resolve_href(&base, "/category/python/").unwrap();
/// assert_eq!(url.as_str(), "https://blog.example.com/category/python/");
/// ```
pub fn resolve_href(base_url: &Url, href: &str) -> UrlResult<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::EmptyLink(href.to_string()));
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return Err(UrlError::InvalidScheme(href.to_string()));
    }

    let resolved = base_url
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    match resolved.scheme() {
        "http" | "https" => Ok(resolved),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

/// Parses an absolute http(s) URL
pub fn parse_http_url(value: &str) -> UrlResult<Url> {
    let url = Url::parse(value).map_err(|e| UrlError::Parse(format!("{}: {}", value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
