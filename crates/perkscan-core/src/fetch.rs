//! Fetching card marketing pages as plain text
//!
//! Pages are downloaded with `reqwest` and flattened with `scraper`: every
//! visible text node is trimmed and the non-empty ones are joined with a
//! single space. Script, style, noscript and template content is skipped.
//! No JavaScript is executed.

use async_trait::async_trait;
use scraper::{Html, Node};
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{Error, Result};

/// Elements whose text never reaches the reader
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Source of page text for the scraper
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch `url` and return its visible text
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// HTTP-backed page source
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        let html = response.text().await?;
        let text = html_to_text(&html);
        debug!("Fetched {} ({} bytes html, {} chars text)", url, html.len(), text.len());
        Ok(text)
    }
}

/// Flatten an HTML document to its visible text
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut parts = Vec::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_joins_trimmed_nodes() {
        let html = r#"
            <html>
              <head><title>Savor</title></head>
              <body>
                <h1>  Earn   <b>8%</b> cash back </h1>
                <p>on Capital One Entertainment purchases</p>
              </body>
            </html>
        "#;
        assert_eq!(
            html_to_text(html),
            "Savor Earn 8% cash back on Capital One Entertainment purchases"
        );
    }

    #[test]
    fn test_html_to_text_skips_scripts_and_styles() {
        let html = r#"
            <body>
              <script>var offer = "99% CASH BACK On everything";</script>
              <style>.hero { color: red; }</style>
              <noscript>Enable JavaScript</noscript>
              <div>3% CASH BACK On Gas</div>
            </body>
        "#;
        assert_eq!(html_to_text(html), "3% CASH BACK On Gas");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        let html = "<p>Groceries &amp; Streaming</p><p>up to&nbsp;$1,500</p>";
        let text = html_to_text(html);
        assert!(text.starts_with("Groceries & Streaming"));
        assert!(text.contains("$1,500"));
    }

    #[test]
    fn test_html_to_text_empty() {
        assert_eq!(html_to_text(""), "");
        assert_eq!(html_to_text("<div>   </div>"), "");
    }

    #[test]
    fn test_http_source_builds() {
        assert!(HttpPageSource::new(&FetchConfig::default()).is_ok());
    }
}
