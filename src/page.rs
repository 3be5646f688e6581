//! HTML parsing boundary.
//!
//! `parse` materializes everything the core ever asks of a page (anchors,
//! footer text, visible text, and the class attributes of block elements)
//! into an owned snapshot, so the DOM itself never crosses an await point
//! and downstream heuristics stay pure functions over plain data.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector must parse"));

static FOOTER_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("footer").expect("footer selector must parse"));

static BLOCK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div, li, article").expect("block selector must parse"));

/// One link: its visible text and raw href.
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    pub text: String,
    pub href: String,
}

/// Owned snapshot of a parsed page.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub anchors: Vec<Anchor>,
    pub footer_text: Option<String>,
    /// All text content, concatenated in document order.
    pub text: String,
    /// `class` attribute of every div/li/article element that has one.
    pub block_classes: Vec<String>,
}

/// Parse raw HTML into a queryable snapshot.
pub fn parse(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    let anchors = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| {
            let href = el.value().attr("href")?.to_string();
            let text = el.text().collect::<String>().trim().to_string();
            Some(Anchor { text, href })
        })
        .collect();

    let footer_text = document
        .select(&FOOTER_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>());

    let text = document.root_element().text().collect::<String>();

    let block_classes = document
        .select(&BLOCK_SELECTOR)
        .filter_map(|el| el.value().attr("class").map(|c| c.to_string()))
        .collect();

    ParsedPage {
        anchors,
        footer_text,
        text,
        block_classes,
    }
}
