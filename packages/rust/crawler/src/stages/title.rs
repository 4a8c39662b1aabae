//! `<title>` extraction — the default invader.

use scraper::{Html, Selector};

use super::Invader;

/// Extracts the text of the page's `<title>` element.
pub struct TitleInvader;

impl Invader for TitleInvader {
    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);
        let title_sel = Selector::parse("title").unwrap();

        doc.select(&title_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }
}
