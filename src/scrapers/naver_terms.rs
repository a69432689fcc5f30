//! Naver terms page extraction
//!
//! Pulls owned data out of listing and detail pages so no parsed document
//! outlives the synchronous call that built it.

use anyhow::Result;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize_string;
use crate::traits::SiteSelectors;

/// Compiled selectors for the encyclopedia layout
pub struct PageSelectors {
    title_link: Selector,
    profile_row: Selector,
    row_label: Selector,
    row_value: Selector,
    thumbnail_link: Selector,
    term_script: Selector,
}

impl PageSelectors {
    pub fn compile(selectors: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            title_link: parse_selector("title link", &selectors.title_link)?,
            profile_row: parse_selector("profile row", &selectors.profile_row)?,
            row_label: parse_selector("row label", &selectors.row_label)?,
            row_value: parse_selector("row value", &selectors.row_value)?,
            thumbnail_link: parse_selector("thumbnail", &selectors.thumbnail_link)?,
            term_script: parse_selector("term script", &selectors.term_script)?,
        })
    }
}

fn parse_selector(what: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} selector: {:?}", what, e))
}

/// A detail-page anchor found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleLink {
    pub title: String,
    pub href: String,
}

/// Everything a detail page contributes to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    /// Normalized (label, value) pairs in table order
    pub rows: Vec<(String, String)>,
    pub source: String,
    pub image: String,
}

/// Detail links on a listing page, in page order. Anchors without an href are skipped.
pub fn extract_title_links(html: &str, selectors: &PageSelectors) -> Vec<TitleLink> {
    let document = Html::parse_document(html);

    document
        .select(&selectors.title_link)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            Some(TitleLink {
                title: normalize_string(&element_text(anchor)),
                href: href.to_string(),
            })
        })
        .collect()
}

/// Extracts profile rows, the term source and the image URL.
///
/// A missing thumbnail gives an empty image. A missing or reshaped term
/// source script is an error: the page layout is no longer the expected one.
pub fn extract_detail(html: &str, selectors: &PageSelectors) -> Result<DetailPage> {
    let document = Html::parse_document(html);

    let script = document
        .select(&selectors.term_script)
        .next()
        .ok_or_else(|| anyhow::anyhow!("term source script not found"))?;
    let source = term_source(&element_text(script))
        .ok_or_else(|| anyhow::anyhow!("term source markers not found in script"))?;

    let image = document
        .select(&selectors.thumbnail_link)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(image_url)
        .unwrap_or_default();

    let rows = document
        .select(&selectors.profile_row)
        .filter_map(|row| {
            let label = row.select(&selectors.row_label).next()?;
            let value = row.select(&selectors.row_value).next()?;
            Some((
                normalize_string(&element_text(label)),
                normalize_string(&element_text(value)),
            ))
        })
        .collect();

    Ok(DetailPage {
        rows,
        source,
        image,
    })
}

/// Citation string embedded in the term script.
///
/// Slices on the markers in a fixed order: `termSource`,
/// `hasNotNewAudioInfra`, `</strong>`, `">`, then cuts at `</p>',` and
/// strips `</a>`. Each `split(..).nth(1)` keeps the text between the
/// first and second occurrence of its marker.
pub fn term_source(script: &str) -> Option<String> {
    let after_field = script.split("termSource").nth(1)?;
    let before_sentinel = after_field.split("hasNotNewAudioInfra").next()?;
    let after_strong = before_sentinel.split("</strong>").nth(1)?;
    let after_quote = after_strong.split("\">").nth(1)?;
    let citation = after_quote.split("</p>',").next()?;

    Some(normalize_string(&citation.replace("</a>", "")))
}

/// Full image URL carried in the `imageUrl` parameter of a thumbnail href
pub fn image_url(href: &str) -> Option<String> {
    let encoded = href.split("imageUrl=").nth(1)?;
    let bytes = urlencoding::decode_binary(encoded.as_bytes());
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
