//! Page title scraping.

use scraper::{Html, Selector};
use std::sync::LazyLock;

use crate::config::MAX_RESPONSE_BODY_SIZE;
use crate::utils::{parse_selector_unsafe, sanitize_text};

const TITLE_SELECTOR_STR: &str = "title";

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(TITLE_SELECTOR_STR, "TITLE_SELECTOR"));

/// Extracts the first `<title>` of an HTML document.
///
/// Returns an empty string if there is no title element or it is empty.
pub fn extract_title(html: &str) -> String {
    let document = Html::parse_document(html);
    match document.select(&TITLE_SELECTOR).next() {
        Some(element) => sanitize_text(&element.text().collect::<String>()),
        None => {
            log::debug!("No title element found in document");
            String::new()
        }
    }
}

/// Fetches `url` and returns its page title, or an empty string on any failure.
pub async fn fetch_title(client: &reqwest::Client, url: &str) -> String {
    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("Title fetch failed for {}: {}", url, e);
            return String::new();
        }
    };

    if !response.status().is_success() {
        log::debug!("Title fetch returned {} for {}", response.status(), url);
        return String::new();
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_RESPONSE_BODY_SIZE {
            log::debug!("Skipping title of {}: body is {} bytes", url, len);
            return String::new();
        }
    }

    match response.text().await {
        Ok(body) => {
            let mut end = body.len().min(MAX_RESPONSE_BODY_SIZE);
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            extract_title(&body[..end])
        }
        Err(e) => {
            log::warn!("Failed to read body of {}: {}", url, e);
            String::new()
        }
    }
}
