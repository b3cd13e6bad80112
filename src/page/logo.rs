//! Logo lookup through an icon-finder API.
//!
//! The API answers `{ "url": ..., "icons": [{ "url": ..., "width": ..., ... }] }`
//! with icons sorted best first; the first icon URL is used.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LogoResponse {
    icons: Vec<Icon>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Icon {
    url: String,
}

/// Returns the first icon URL of an icon API response, if any.
pub fn first_icon_url(body: &str) -> Option<String> {
    let response: LogoResponse = serde_json::from_str(body).ok()?;
    response
        .icons
        .into_iter()
        .map(|icon| icon.url)
        .find(|url| !url.is_empty())
}

/// Looks up the logo of `domain`, or returns an empty string on any failure.
pub async fn fetch_logo(client: &reqwest::Client, api_url: &str, domain: &str) -> String {
    let response = match client.get(api_url).query(&[("url", domain)]).send().await {
        Ok(resp) => resp,
        Err(e) => {
            log::warn!("Logo lookup failed for {}: {}", domain, e);
            return String::new();
        }
    };

    if !response.status().is_success() {
        log::debug!("Logo lookup returned {} for {}", response.status(), domain);
        return String::new();
    }

    match response.text().await {
        Ok(body) => first_icon_url(&body).unwrap_or_else(|| {
            log::debug!("No icons listed for {}", domain);
            String::new()
        }),
        Err(e) => {
            log::warn!("Failed to read logo lookup for {}: {}", domain, e);
            String::new()
        }
    }
}
