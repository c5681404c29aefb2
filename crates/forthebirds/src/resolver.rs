//! Place-name → eBird code resolution
//!
//! Every code is resolved from the names held in the [`ClientContext`]:
//! country first, then state within that country, then substate within that
//! state. Each step fetches the reference list for its parent code and looks
//! the name up with [`resolve_code`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ebird_api::EbirdClient;
use moka::future::Cache;
use tracing::debug;

use crate::context::ClientContext;
use crate::error::{PlannerError, Result};
use crate::region::{resolve_code, Hotspot, HotspotScope, LookupLevel, Region, RegionLevel};

const REFERENCE_CACHE_CAPACITY: u64 = 1_000;

/// Resolves the context's country/state labels (and per-call substate and
/// hotspot names) into region and location codes
pub struct RegionResolver {
    api: Arc<EbirdClient>,
    context: Arc<ClientContext>,
    region_cache: Option<Cache<String, Arc<Vec<Region>>>>,
    hotspot_cache: Option<Cache<String, Arc<Vec<Hotspot>>>>,
}

impl RegionResolver {
    /// Create a resolver that re-fetches every reference list on every lookup
    pub fn new(api: Arc<EbirdClient>, context: Arc<ClientContext>) -> Self {
        Self {
            api,
            context,
            region_cache: None,
            hotspot_cache: None,
        }
    }

    /// Memoize reference and hotspot lists for `ttl`
    pub fn with_reference_cache(mut self, ttl: Duration) -> Self {
        self.region_cache = Some(
            Cache::builder()
                .max_capacity(REFERENCE_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build(),
        );
        self.hotspot_cache = Some(
            Cache::builder()
                .max_capacity(REFERENCE_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build(),
        );
        self
    }

    pub fn context(&self) -> &ClientContext {
        &self.context
    }

    /// Names of every country eBird knows
    pub async fn country_names(&self) -> Result<Vec<String>> {
        Ok(names_of(&self.countries().await?))
    }

    /// Code of the context's country
    pub async fn country_code(&self) -> Result<String> {
        let name = self
            .context
            .country_name()
            .ok_or(PlannerError::MissingContext {
                level: LookupLevel::Country,
            })?;
        let countries = self.countries().await?;
        let code = resolve_code(name, &countries, LookupLevel::Country)?;
        debug!(country = name, code = %code, "Resolved country");
        Ok(code)
    }

    /// Names of every state in the context's country
    pub async fn state_names(&self) -> Result<Vec<String>> {
        let country_code = self.country_code().await?;
        Ok(names_of(&self.states_of(&country_code).await?))
    }

    /// Code of the context's state
    pub async fn state_code(&self) -> Result<String> {
        let name = self.context.state_name().ok_or(PlannerError::MissingContext {
            level: LookupLevel::State,
        })?;
        let country_code = self.country_code().await?;
        let states = self.states_of(&country_code).await?;
        let code = resolve_code(name, &states, LookupLevel::State)?;
        debug!(state = name, code = %code, "Resolved state");
        Ok(code)
    }

    /// Names of every substate in the context's state
    pub async fn substate_names(&self) -> Result<Vec<String>> {
        let state_code = self.state_code().await?;
        Ok(names_of(&self.substates_of(&state_code).await?))
    }

    /// Code of a substate within the context's state
    pub async fn substate_code(&self, substate_name: &str) -> Result<String> {
        let state_code = self.state_code().await?;
        let substates = self.substates_of(&state_code).await?;
        let code = resolve_code(substate_name, &substates, LookupLevel::Substate)?;
        debug!(substate = substate_name, code = %code, "Resolved substate");
        Ok(code)
    }

    /// Code for a region level; substate level needs the substate's name
    pub async fn region_code(
        &self,
        level: RegionLevel,
        substate_name: Option<&str>,
    ) -> Result<String> {
        match level {
            RegionLevel::Country => self.country_code().await,
            RegionLevel::State => self.state_code().await,
            RegionLevel::Substate => {
                let name = substate_name.ok_or(PlannerError::InvalidParameter {
                    name: "substate_name",
                    value: "<missing> (required for substate region_type)".to_string(),
                })?;
                self.substate_code(name).await
            }
        }
    }

    /// Every hotspot in the context's state or in one of its substates
    pub async fn regional_hotspots(&self, scope: &HotspotScope) -> Result<Vec<Hotspot>> {
        let region_code = self.scope_code(scope).await?;
        Ok(self.hotspots_in(&region_code).await?.as_ref().clone())
    }

    /// Location code of a hotspot
    ///
    /// Hotspot names are not unique across a state; when a name is shared,
    /// the lookup fails as ambiguous and should be retried at substate scope.
    pub async fn hotspot_code(&self, hotspot_name: &str, scope: &HotspotScope) -> Result<String> {
        let region_code = self.scope_code(scope).await?;
        let hotspots = self.hotspots_in(&region_code).await?;
        let code = resolve_code(hotspot_name, &hotspots, LookupLevel::Hotspot)?;
        debug!(hotspot = hotspot_name, region = %region_code, code = %code, "Resolved hotspot");
        Ok(code)
    }

    async fn scope_code(&self, scope: &HotspotScope) -> Result<String> {
        match scope {
            HotspotScope::State => self.state_code().await,
            HotspotScope::Substate(name) => self.substate_code(name).await,
        }
    }

    async fn countries(&self) -> Result<Arc<Vec<Region>>> {
        let api = &self.api;
        self.cached_regions("country/world".to_string(), || async move {
            Ok::<_, PlannerError>(regions(api.countries().await?))
        })
        .await
    }

    async fn states_of(&self, country_code: &str) -> Result<Arc<Vec<Region>>> {
        let api = &self.api;
        self.cached_regions(format!("subnational1/{}", country_code), || async move {
            Ok::<_, PlannerError>(regions(api.subnational1(country_code).await?))
        })
        .await
    }

    async fn substates_of(&self, state_code: &str) -> Result<Arc<Vec<Region>>> {
        let api = &self.api;
        self.cached_regions(format!("subnational2/{}", state_code), || async move {
            Ok::<_, PlannerError>(regions(api.subnational2(state_code).await?))
        })
        .await
    }

    async fn hotspots_in(&self, region_code: &str) -> Result<Arc<Vec<Hotspot>>> {
        let fetch = || async {
            let entries = self.api.hotspots(region_code).await?;
            Ok::<_, PlannerError>(Arc::new(
                entries.into_iter().map(Hotspot::from).collect::<Vec<_>>(),
            ))
        };

        match &self.hotspot_cache {
            Some(cache) => {
                if let Some(hit) = cache.get(region_code).await {
                    debug!(region = region_code, "Hotspot list cache hit");
                    return Ok(hit);
                }
                let list = fetch().await?;
                cache.insert(region_code.to_string(), list.clone()).await;
                Ok(list)
            }
            None => fetch().await,
        }
    }

    async fn cached_regions<F, Fut>(&self, key: String, fetch: F) -> Result<Arc<Vec<Region>>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Region>>>,
    {
        match &self.region_cache {
            Some(cache) => {
                if let Some(hit) = cache.get(&key).await {
                    debug!(list = %key, "Reference list cache hit");
                    return Ok(hit);
                }
                let list = Arc::new(fetch().await?);
                cache.insert(key, list.clone()).await;
                Ok(list)
            }
            None => Ok(Arc::new(fetch().await?)),
        }
    }
}

fn regions(entries: Vec<ebird_api::RegionEntry>) -> Vec<Region> {
    entries.into_iter().map(Region::from).collect()
}

fn names_of(list: &[Region]) -> Vec<String> {
    list.iter().map(|region| region.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(country: &str, state: &str) -> RegionResolver {
        // Unroutable port: any request that gets issued fails with a transport error
        let api = EbirdClient::with_base_url("abc123", "http://127.0.0.1:1", Duration::from_secs(1))
            .unwrap();
        let context = ClientContext::new("abc123", country, state).unwrap();
        RegionResolver::new(Arc::new(api), Arc::new(context))
    }

    #[tokio::test]
    async fn test_country_code_without_country_fails_before_request() {
        let result = resolver("", "New York").country_code().await;
        assert!(matches!(
            result,
            Err(PlannerError::MissingContext {
                level: LookupLevel::Country
            })
        ));
    }

    #[tokio::test]
    async fn test_substate_without_state_context_fails() {
        let result = resolver("United States", "").substate_code("Kings").await;
        assert!(matches!(
            result,
            Err(PlannerError::MissingContext {
                level: LookupLevel::State
            })
        ));
    }

    #[tokio::test]
    async fn test_substate_level_requires_name() {
        let result = resolver("United States", "New York")
            .region_code(RegionLevel::Substate, None)
            .await;
        assert!(matches!(
            result,
            Err(PlannerError::InvalidParameter {
                name: "substate_name",
                ..
            })
        ));
    }
}
