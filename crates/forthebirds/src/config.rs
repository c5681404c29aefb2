use std::env;
use std::time::Duration;

use url::Url;

use crate::context::ClientContext;
use crate::error::{PlannerError, Result};

pub const DEFAULT_API_URL: &str = "https://api.ebird.org/v2";
pub const DEFAULT_SPECIES_URL: &str = "https://ebird.org/species";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_ID_INFO_CONCURRENCY: usize = 4;

/// Planner configuration, built in code or parsed from environment variables
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub token: String,
    pub country_name: String,
    pub state_name: String,
    pub api_url: String,
    pub species_url: String,
    pub timeout: Duration,
    /// Species pages scraped at once when identification info is requested
    pub id_info_concurrency: usize,
    /// Memoize reference lists for this long; `None` re-fetches on every lookup
    pub reference_cache_ttl: Option<Duration>,
}

impl PlannerConfig {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            country_name: String::new(),
            state_name: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            species_url: DEFAULT_SPECIES_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            id_info_concurrency: DEFAULT_ID_INFO_CONCURRENCY,
            reference_cache_ttl: None,
        }
    }

    pub fn with_country(mut self, country_name: &str) -> Self {
        self.country_name = country_name.to_string();
        self
    }

    pub fn with_state(mut self, state_name: &str) -> Self {
        self.state_name = state_name.to_string();
        self
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.to_string();
        self
    }

    pub fn with_species_url(mut self, species_url: &str) -> Self {
        self.species_url = species_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_id_info_concurrency(mut self, concurrency: usize) -> Self {
        self.id_info_concurrency = concurrency;
        self
    }

    pub fn with_reference_cache(mut self, ttl: Duration) -> Self {
        self.reference_cache_ttl = Some(ttl);
        self
    }

    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from any key→value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("EBIRD_API_TOKEN")
            .ok_or_else(|| PlannerError::Config("EBIRD_API_TOKEN is not set".to_string()))?;

        let mut config = Self::new(&token);

        if let Some(country) = lookup("EBIRD_COUNTRY") {
            config.country_name = country;
        }
        if let Some(state) = lookup("EBIRD_STATE") {
            config.state_name = state;
        }
        if let Some(api_url) = lookup("EBIRD_API_URL") {
            config.api_url = api_url;
        }
        if let Some(species_url) = lookup("EBIRD_SPECIES_URL") {
            config.species_url = species_url;
        }
        if let Some(secs) = lookup("EBIRD_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                PlannerError::Config(format!("EBIRD_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(n) = lookup("EBIRD_ID_INFO_CONCURRENCY") {
            config.id_info_concurrency = n.trim().parse::<usize>().map_err(|_| {
                PlannerError::Config(format!("EBIRD_ID_INFO_CONCURRENCY is not a number: {}", n))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the token, both base URLs, and the numeric settings
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(PlannerError::Config("API token is empty".to_string()));
        }
        for (key, value) in [("api_url", &self.api_url), ("species_url", &self.species_url)] {
            Url::parse(value)
                .map_err(|e| {
                    PlannerError::Config(format!("{} '{}' is invalid: {}", key, value, e))
                })?;
        }
        if self.id_info_concurrency == 0 {
            return Err(PlannerError::Config(
                "id_info_concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(PlannerError::Config("timeout must be non-zero".to_string()));
        }
        Ok(())
    }

    pub fn context(&self) -> Result<ClientContext> {
        ClientContext::new(&self.token, &self.country_name, &self.state_name)
    }
}
