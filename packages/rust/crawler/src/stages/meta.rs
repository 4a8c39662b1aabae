//! Meta-tag extraction — second extraction strategy.
//!
//! Sites often carry a cleaner brand name in `og:site_name` or
//! `application-name` than in their `<title>` (which tends to append
//! taglines and separators).

use scraper::{Html, Selector};

use super::Invader;

/// Extracts a site name from well-known meta tags, tried in order.
pub struct MetaNameInvader;

impl Invader for MetaNameInvader {
    fn extract(&self, html: &str) -> String {
        let doc = Html::parse_document(html);

        let selectors = [
            r#"meta[property="og:site_name"]"#,
            r#"meta[name="application-name"]"#,
        ];

        for sel_str in selectors {
            let sel = Selector::parse(sel_str).unwrap();
            if let Some(el) = doc.select(&sel).next() {
                if let Some(content) = el.value().attr("content") {
                    let content = content.trim();
                    if !content.is_empty() {
                        return content.to_string();
                    }
                }
            }
        }

        String::new()
    }
}
