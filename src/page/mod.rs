//! Page metadata collaborators.
//!
//! Scrapes the page title of a domain and looks up its logo. Both are
//! best-effort: failures yield empty strings and never block an assessment.

mod logo;
mod title;

use std::sync::Arc;

use crate::pipeline::PageMetadata;

pub use logo::{fetch_logo, first_icon_url};
pub use title::{extract_title, fetch_title};

/// Fetches title and logo for a domain.
#[derive(Clone)]
pub struct PageFetcher {
    client: Arc<reqwest::Client>,
    logo_api_url: String,
    site_url: Option<String>,
}

impl PageFetcher {
    pub fn new(client: Arc<reqwest::Client>, logo_api_url: impl Into<String>) -> Self {
        Self {
            client,
            logo_api_url: logo_api_url.into(),
            site_url: None,
        }
    }

    /// Fetches titles from `site_url` instead of `https://{domain}/`.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = Some(site_url.into());
        self
    }

    /// Fetches the title of `https://{domain}/` and the logo concurrently.
    pub async fn fetch(&self, domain: &str) -> PageMetadata {
        let site = self
            .site_url
            .clone()
            .unwrap_or_else(|| format!("https://{}/", domain));
        let (title, logo) = tokio::join!(
            fetch_title(&self.client, &site),
            fetch_logo(&self.client, &self.logo_api_url, domain)
        );
        PageMetadata { title, logo }
    }
}
