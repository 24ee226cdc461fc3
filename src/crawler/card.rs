//! Reading one article card from the listing page
//!
//! A card is expected to hold exactly two element children: the article
//! block (title and link) followed by the categories block. Anything else
//! means the site layout drifted, and is reported as a malformed document
//! naming the card and what was seen.

use crate::crawler::extractor::{ElementHandle, StructuralQuery};
use crate::url::resolve_href;
use crate::{HarvestError, Result};
use url::Url;

/// Number of element children every card must have
pub const CARD_CHILD_COUNT: usize = 2;

/// A link read from a card: display title and absolute target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    pub title: String,
    pub url: Url,
}

/// Plain data read from one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub article: CardLink,
    pub categories: Vec<CardLink>,
}

/// Reads a card element into a [`Card`]
///
/// # Arguments
///
/// * `index` - Zero-based position of the card on the listing (for diagnostics)
/// * `card` - The card element matched by the listing query
/// * `category_query` - Locates category links inside the categories block
/// * `base_url` - Base that relative hrefs are resolved against
pub fn read_card(
    index: usize,
    card: &ElementHandle<'_>,
    category_query: &StructuralQuery,
    base_url: &Url,
) -> Result<Card> {
    let children = card.children();
    let [article_block, categories_block] = children.as_slice() else {
        return Err(HarvestError::MalformedDocument(format!(
            "card {} has {} element children, expected {} (article block, categories block)",
            index,
            children.len(),
            CARD_CHILD_COUNT
        )));
    };

    let article = read_article_block(index, article_block, base_url)?;

    let categories = categories_block
        .select(category_query)
        .iter()
        .map(|link| read_link(index, link, base_url))
        .collect::<Result<Vec<_>>>()?;

    Ok(Card {
        article,
        categories,
    })
}

/// Title comes from the whole block's text; the URL from its first link
fn read_article_block(index: usize, block: &ElementHandle<'_>, base_url: &Url) -> Result<CardLink> {
    let title = block.normalized_text();
    if title.is_empty() {
        return Err(HarvestError::MalformedDocument(format!(
            "card {} has an empty article title",
            index
        )));
    }

    let href = first_link_href(block).ok_or_else(|| {
        HarvestError::MalformedDocument(format!(
            "card {} article block '{}' has no link",
            index, title
        ))
    })?;

    let url = resolve(index, href, base_url)?;
    Ok(CardLink { title, url })
}

fn read_link(index: usize, link: &ElementHandle<'_>, base_url: &Url) -> Result<CardLink> {
    let title = link.normalized_text();
    if title.is_empty() {
        return Err(HarvestError::MalformedDocument(format!(
            "card {} has a category link without text",
            index
        )));
    }

    let href = link.attr("href").ok_or_else(|| {
        HarvestError::MalformedDocument(format!(
            "card {} category '{}' has no href",
            index, title
        ))
    })?;

    let url = resolve(index, href, base_url)?;
    Ok(CardLink { title, url })
}

fn first_link_href<'a>(block: &ElementHandle<'a>) -> Option<&'a str> {
    if block.tag_name() == "a" {
        if let Some(href) = block.attr("href") {
            return Some(href);
        }
    }

    find_link(block)
}

// Depth-first, document order
fn find_link<'a>(element: &ElementHandle<'a>) -> Option<&'a str> {
    for child in element.children() {
        if child.tag_name() == "a" {
            if let Some(href) = child.attr("href") {
                return Some(href);
            }
        }
        if let Some(href) = find_link(&child) {
            return Some(href);
        }
    }
    None
}

fn resolve(index: usize, href: &str, base_url: &Url) -> Result<Url> {
    resolve_href(base_url, href).map_err(|e| {
        HarvestError::MalformedDocument(format!("card {} has an unusable link: {}", index, e))
    })
}
