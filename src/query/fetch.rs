//! Dereferences job-description URLs into plain text.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use tracing::{debug, warn};

use super::text::collapse_whitespace;

static SCRIPT_STYLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)\s*>").ok());
static TAGS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").ok());

/// True for a single http(s) URL with no surrounding text.
pub fn looks_like_url(input: &str) -> bool {
    let trimmed = input.trim();
    (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
        && !trimmed.contains(char::is_whitespace)
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Strips scripts, styles and tags; collapses whitespace.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();
    if let Some(re) = SCRIPT_STYLE.as_ref() {
        text = re.replace_all(&text, " ").into_owned();
    }
    if let Some(re) = TAGS.as_ref() {
        text = re.replace_all(&text, " ").into_owned();
    }
    collapse_whitespace(&decode_entities(&text))
}

/// Fetches job-description pages with a bounded timeout.
#[derive(Debug, Clone)]
pub struct JdFetcher {
    client: reqwest::Client,
}

impl JdFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("assessment-recommender/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Returns the page text, or `None` on any failure (the caller analyzes the URL itself).
    pub async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url.trim()).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(url, error = %e, "Job description fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(url, status = %response.status(), "Job description fetch returned an error status");
            return None;
        }

        match response.text().await {
            Ok(body) => {
                let text = html_to_text(&body);
                debug!(url, chars = text.len(), "Job description fetched");
                (!text.is_empty()).then_some(text)
            }
            Err(e) => {
                warn!(url, error = %e, "Job description body could not be read");
                None
            }
        }
    }
}
