//! Result-page parsing for web discovery.
//!
//! A usable result block carries all three of: a link, a title heading, and
//! a two-line clamped description. Blocks missing any of the three are ad
//! units, knowledge panels, or other chrome and are skipped without counting
//! against the requested total.

use scraper::{Html, Selector};

/// Extract candidate result URLs from one HTML results page, in encounter
/// order.
pub(crate) fn parse_result_page(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    let block_sel = Selector::parse("div.g").unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();
    let title_sel = Selector::parse("h3").unwrap();
    let desc_sel = Selector::parse(r#"div[style*="-webkit-line-clamp:2"] span"#).unwrap();

    let mut urls = Vec::new();

    for block in doc.select(&block_sel) {
        let link = block
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"));
        let title = block.select(&title_sel).next();
        let description = block.select(&desc_sel).next();

        if let (Some(href), Some(_), Some(_)) = (link, title, description) {
            urls.push(href.to_string());
        }
    }

    urls
}
