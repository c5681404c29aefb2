use std::sync::Arc;

use ebird_api::EbirdClient;
use ebird_species_page::SpeciesPageClient;
use tracing::info;

use crate::config::PlannerConfig;
use crate::context::ClientContext;
use crate::error::Result;
use crate::output::{QueryOutput, HOTSPOT_COLUMNS};
use crate::query::{
    ObservationQuery, ObservationTarget, QueryFlavor, QueryOptions, SpeciesRef, TargetSelection,
};
use crate::region::{HotspotScope, RegionLevel};
use crate::resolver::RegionResolver;

/// Entry point: one context, one resolver, one query service
///
/// ```no_run
/// use forthebirds::{PlannerConfig, QueryOptions, TargetSelection, TripPlanner};
///
/// # async fn example() -> forthebirds::Result<()> {
/// let config = PlannerConfig::new("abc123")
///     .with_country("United States")
///     .with_state("New York");
/// let planner = TripPlanner::new(config)?;
///
/// let kings = planner
///     .recent_observations(
///         TargetSelection::substate("Kings"),
///         QueryOptions::default().days_back(7),
///     )
///     .await?;
/// println!("{} sightings", kings.len());
/// # Ok(())
/// # }
/// ```
pub struct TripPlanner {
    resolver: Arc<RegionResolver>,
    query: ObservationQuery,
}

impl TripPlanner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let context = Arc::new(config.context()?);

        let api = Arc::new(EbirdClient::with_base_url(
            context.token(),
            &config.api_url,
            config.timeout,
        )?);
        let species_pages = Arc::new(SpeciesPageClient::with_base_url(
            &config.species_url,
            config.timeout,
        )?);

        let mut resolver = RegionResolver::new(api.clone(), context);
        if let Some(ttl) = config.reference_cache_ttl {
            resolver = resolver.with_reference_cache(ttl);
        }
        let resolver = Arc::new(resolver);

        let query = ObservationQuery::new(api, resolver.clone(), species_pages)
            .with_id_info_concurrency(config.id_info_concurrency);

        info!(
            api_url = %config.api_url,
            country = %config.country_name,
            state = %config.state_name,
            "Trip planner ready"
        );

        Ok(Self { resolver, query })
    }

    /// Build from `EBIRD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(PlannerConfig::from_env()?)
    }

    pub fn context(&self) -> &ClientContext {
        self.resolver.context()
    }

    pub fn resolver(&self) -> &RegionResolver {
        &self.resolver
    }

    pub fn query(&self) -> &ObservationQuery {
        &self.query
    }

    pub async fn country_names(&self) -> Result<Vec<String>> {
        self.resolver.country_names().await
    }

    pub async fn country_code(&self) -> Result<String> {
        self.resolver.country_code().await
    }

    pub async fn state_names(&self) -> Result<Vec<String>> {
        self.resolver.state_names().await
    }

    pub async fn state_code(&self) -> Result<String> {
        self.resolver.state_code().await
    }

    pub async fn substate_names(&self) -> Result<Vec<String>> {
        self.resolver.substate_names().await
    }

    pub async fn substate_code(&self, substate_name: &str) -> Result<String> {
        self.resolver.substate_code(substate_name).await
    }

    /// Hotspots of the context's state, or of a substate when one is named
    pub async fn regional_hotspots(
        &self,
        substate_name: Option<&str>,
        region_type: RegionLevel,
        as_json: bool,
    ) -> Result<QueryOutput> {
        let scope = HotspotScope::from_level(region_type, substate_name)?;
        let hotspots = self.resolver.regional_hotspots(&scope).await?;
        QueryOutput::build(&hotspots, &HOTSPOT_COLUMNS, as_json)
    }

    pub async fn hotspot_code(
        &self,
        hotspot_name: &str,
        substate_name: Option<&str>,
        region_type: RegionLevel,
    ) -> Result<String> {
        let scope = HotspotScope::from_level(region_type, substate_name)?;
        self.resolver.hotspot_code(hotspot_name, &scope).await
    }

    pub async fn recent_observations(
        &self,
        selection: TargetSelection,
        options: QueryOptions,
    ) -> Result<QueryOutput> {
        self.run(QueryFlavor::Recent, selection, options).await
    }

    pub async fn notable_observations(
        &self,
        selection: TargetSelection,
        options: QueryOptions,
    ) -> Result<QueryOutput> {
        self.run(QueryFlavor::Notable, selection, options).await
    }

    pub async fn species_observations(
        &self,
        species: SpeciesRef,
        selection: TargetSelection,
        options: QueryOptions,
    ) -> Result<QueryOutput> {
        self.run(QueryFlavor::Species(species), selection, options)
            .await
    }

    async fn run(
        &self,
        flavor: QueryFlavor,
        selection: TargetSelection,
        options: QueryOptions,
    ) -> Result<QueryOutput> {
        let target = ObservationTarget::select(selection)?;
        self.query.fetch(&flavor, &target, &options).await
    }
}
