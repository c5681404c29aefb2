use std::time::Duration;

use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{Result, SpeciesPageError};

const DEFAULT_BASE_URL: &str = "https://ebird.org/species";
const DEFAULT_USER_AGENT: &str = "forthebirds/0.1 (species identification lookup)";

/// Selectors tried in order; the first non-empty `content` wins
const DESCRIPTION_SELECTORS: [&str; 2] = [
    r#"meta[property="og:description"]"#,
    r#"meta[name="description"]"#,
];

/// Fetches the identification paragraph from public species pages
pub struct SpeciesPageClient {
    client: reqwest::Client,
    base_url: String,
}

impl SpeciesPageClient {
    /// Create a client against ebird.org (30 second timeout)
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Create a client against a custom species page base URL
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Identification text for a species, keyed by its eBird species code
    /// (e.g. `amewoo` for American Woodcock)
    pub async fn id_info(&self, species_code: &str) -> Result<String> {
        let url = format!("{}/{}", self.base_url, urlencoding::encode(species_code));

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SpeciesPageError::IdInfoNotFound {
                species_code: species_code.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SpeciesPageError::Upstream {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let info = extract_id_info(&body).ok_or_else(|| SpeciesPageError::IdInfoNotFound {
            species_code: species_code.to_string(),
        })?;

        debug!(species = species_code, chars = info.len(), "Scraped identification info");

        Ok(info)
    }
}

/// Pull the identification paragraph out of a species page
pub fn extract_id_info(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    DESCRIPTION_SELECTORS.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .filter_map(|element| element.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty())
            .map(str::to_string)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_og_description() {
        let html = r#"<html><head>
            <meta property="og:title" content="American Woodcock - eBird">
            <meta property="og:description" content="  Plump, well-camouflaged shorebird that favors wooded areas.  ">
            </head><body></body></html>"#;
        assert_eq!(
            extract_id_info(html).as_deref(),
            Some("Plump, well-camouflaged shorebird that favors wooded areas.")
        );
    }

    #[test]
    fn test_extract_falls_back_to_meta_description() {
        let html = r#"<html><head>
            <meta name="description" content="Small, active songbird.">
            </head></html>"#;
        assert_eq!(
            extract_id_info(html).as_deref(),
            Some("Small, active songbird.")
        );
    }

    #[test]
    fn test_extract_ignores_empty_content() {
        let html = r#"<html><head>
            <meta property="og:description" content="   ">
            </head></html>"#;
        assert_eq!(extract_id_info(html), None);
    }

    #[test]
    fn test_extract_missing_section() {
        assert_eq!(extract_id_info("<html><body><p>Nothing</p></body></html>"), None);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client =
            SpeciesPageClient::with_base_url("http://127.0.0.1:1/species", Duration::from_secs(2))
                .unwrap();
        let result = client.id_info("amewoo").await;
        assert!(matches!(result, Err(SpeciesPageError::Http(_))));
    }
}
