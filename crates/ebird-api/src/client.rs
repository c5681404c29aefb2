//! eBird API HTTP client

use crate::error::{EbirdError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const TOKEN_HEADER: &str = "X-eBirdApiToken";

/// Client for the eBird API v2
///
/// Every request carries the API token header. Region and species codes are
/// percent-encoded into the path; non-success statuses become
/// [`EbirdError::Upstream`] carrying the status and the endpoint path.
pub struct EbirdClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl EbirdClient {
    /// Base URL for eBird API v2
    pub const DEFAULT_BASE_URL: &'static str = "https://api.ebird.org/v2";

    /// Create a client against the public API (30 second timeout)
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, Self::DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    /// Create a client against a custom base URL with a custom timeout
    pub fn with_base_url(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        if token.is_empty() {
            return Err(EbirdError::MissingToken);
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All countries (`GET /ref/region/list/country/world`)
    pub async fn countries(&self) -> Result<Vec<RegionEntry>> {
        self.get_json("/ref/region/list/country/world".to_string(), None)
            .await
    }

    /// States / provinces of a country (`GET /ref/region/list/subnational1/{country}`)
    pub async fn subnational1(&self, country_code: &str) -> Result<Vec<RegionEntry>> {
        let path = format!(
            "/ref/region/list/subnational1/{}",
            urlencoding::encode(country_code)
        );
        self.get_json(path, None).await
    }

    /// Counties or local equivalents of a state (`GET /ref/region/list/subnational2/{state}`)
    pub async fn subnational2(&self, state_code: &str) -> Result<Vec<RegionEntry>> {
        let path = format!(
            "/ref/region/list/subnational2/{}",
            urlencoding::encode(state_code)
        );
        self.get_json(path, None).await
    }

    /// Hotspots within a region (`GET /ref/hotspot/{region}?fmt=json`)
    pub async fn hotspots(&self, region_code: &str) -> Result<Vec<HotspotEntry>> {
        let path = format!("/ref/hotspot/{}", urlencoding::encode(region_code));
        self.get_json(path, Some("fmt=json".to_string())).await
    }

    /// Recent observations (`GET /data/obs/{region}/recent`)
    pub async fn recent_observations(
        &self,
        region_code: &str,
        params: &ObservationParams,
    ) -> Result<Vec<Observation>> {
        let path = format!("/data/obs/{}/recent", urlencoding::encode(region_code));
        self.get_json(path, Some(params.query_string())).await
    }

    /// Recent notable observations (`GET /data/obs/{region}/recent/notable`)
    pub async fn notable_observations(
        &self,
        region_code: &str,
        params: &ObservationParams,
    ) -> Result<Vec<Observation>> {
        let path = format!(
            "/data/obs/{}/recent/notable",
            urlencoding::encode(region_code)
        );
        self.get_json(path, Some(params.query_string())).await
    }

    /// Recent observations of one species (`GET /data/obs/{region}/recent/{species}`)
    pub async fn species_observations(
        &self,
        region_code: &str,
        species_code: &str,
        params: &ObservationParams,
    ) -> Result<Vec<Observation>> {
        let path = format!(
            "/data/obs/{}/recent/{}",
            urlencoding::encode(region_code),
            urlencoding::encode(species_code)
        );
        self.get_json(path, Some(params.query_string())).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: String,
        query: Option<String>,
    ) -> Result<T> {
        let url = match &query {
            Some(q) => format!("{}{}?{}", self.base_url, path, q),
            None => format!("{}{}", self.base_url, path),
        };

        debug!(endpoint = %path, query = query.as_deref().unwrap_or(""), "eBird request");

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(endpoint = %path, status = status.as_u16(), "eBird returned error status");
            return Err(EbirdError::Upstream {
                status: status.as_u16(),
                endpoint: path,
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
