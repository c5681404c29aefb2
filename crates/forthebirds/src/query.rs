//! Observation queries
//!
//! A query is a flavor (recent, notable, one species), a target (hotspot,
//! substate, state/country, or an explicit location list), and options. The
//! target is resolved to a region code through the [`RegionResolver`], the
//! options become the endpoint's query parameters, and the JSON rows are
//! normalized into [`ObservationRecord`]s.

use std::sync::Arc;

use ebird_api::{EbirdClient, ObservationParams};
use ebird_species_page::SpeciesPageClient;
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::id_info::attach_id_info;
use crate::output::{QueryOutput, OBSERVATION_COLUMNS};
use crate::record::{dedupe_sightings, normalize, ObservationRecord};
use crate::region::{HotspotScope, RegionLevel};
use crate::resolver::RegionResolver;

/// Most locations the API accepts in one multi-location request
pub const MAX_LOCATIONS: usize = 10;
pub const MIN_DAYS_BACK: u32 = 1;
pub const MAX_DAYS_BACK: u32 = 30;
pub const DEFAULT_DAYS_BACK: u32 = 14;
pub const MAX_RESULTS_LIMIT: u32 = 10_000;
const DEFAULT_ID_INFO_CONCURRENCY: usize = 4;

/// What an observation query is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservationTarget {
    /// A named hotspot, looked up in the context's state or one of its substates
    Hotspot { name: String, scope: HotspotScope },
    /// A substate of the context's state
    Substate { name: String },
    /// The context's state or country
    Region(RegionLevel),
    /// Up to [`MAX_LOCATIONS`] codes used as given, without name resolution
    MultiLocation(Vec<String>),
}

/// Optional, interdependent target fields as a caller supplies them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    pub hotspot_name: Option<String>,
    pub substate_name: Option<String>,
    pub region_type: Option<RegionLevel>,
    pub locations: Vec<String>,
}

impl TargetSelection {
    pub fn hotspot(name: &str) -> Self {
        Self {
            hotspot_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn substate(name: &str) -> Self {
        Self {
            substate_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn region(level: RegionLevel) -> Self {
        Self {
            region_type: Some(level),
            ..Default::default()
        }
    }

    pub fn locations<S: AsRef<str>>(codes: &[S]) -> Self {
        Self {
            locations: codes.iter().map(|c| c.as_ref().to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn in_substate(mut self, name: &str) -> Self {
        self.substate_name = Some(name.to_string());
        self
    }

    pub fn at_level(mut self, level: RegionLevel) -> Self {
        self.region_type = Some(level);
        self
    }
}

impl ObservationTarget {
    /// Pick the target a selection describes
    ///
    /// An explicit location list wins outright. Otherwise a hotspot name
    /// beats a substate name, which beats the state or country bound in the
    /// context (`region_type`, state by default).
    pub fn select(selection: TargetSelection) -> Result<Self> {
        let TargetSelection {
            hotspot_name,
            substate_name,
            region_type,
            locations,
        } = selection;

        if !locations.is_empty() {
            return Self::multi_location(locations);
        }

        if let Some(name) = hotspot_name {
            let level = region_type.unwrap_or(if substate_name.is_some() {
                RegionLevel::Substate
            } else {
                RegionLevel::State
            });
            let scope = HotspotScope::from_level(level, substate_name.as_deref())?;
            return Ok(Self::Hotspot { name, scope });
        }

        if let Some(name) = substate_name {
            return match region_type {
                None | Some(RegionLevel::Substate) => Ok(Self::Substate { name }),
                Some(level) => Err(PlannerError::InvalidParameter {
                    name: "region_type",
                    value: format!("{} (substate '{}' given)", level, name),
                }),
            };
        }

        match region_type.unwrap_or_default() {
            RegionLevel::Substate => Err(PlannerError::InvalidParameter {
                name: "substate_name",
                value: "<missing> (required for substate region_type)".to_string(),
            }),
            level => Ok(Self::Region(level)),
        }
    }

    /// Multi-location target, checked against the API's location limit
    pub fn multi_location(codes: Vec<String>) -> Result<Self> {
        check_locations(&codes)?;
        Ok(Self::MultiLocation(codes))
    }
}

fn check_locations(codes: &[String]) -> Result<()> {
    if codes.is_empty() {
        return Err(PlannerError::InvalidParameter {
            name: "locations",
            value: "<empty list>".to_string(),
        });
    }
    if codes.len() > MAX_LOCATIONS {
        return Err(PlannerError::TooManyLocations {
            count: codes.len(),
            max: MAX_LOCATIONS,
        });
    }
    if let Some(blank) = codes.iter().find(|c| c.trim().is_empty()) {
        return Err(PlannerError::InvalidParameter {
            name: "locations",
            value: format!("'{}' (blank location code)", blank),
        });
    }
    Ok(())
}

/// Query options; see [`QueryOptions::validate`] for accepted ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub days_back: u32,
    pub only_hotspots: bool,
    pub include_id_info: bool,
    pub as_json: bool,
    pub max_results: Option<u32>,
    pub include_provisional: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            only_hotspots: false,
            include_id_info: false,
            as_json: false,
            max_results: None,
            include_provisional: false,
        }
    }
}

impl QueryOptions {
    pub fn days_back(mut self, days: u32) -> Self {
        self.days_back = days;
        self
    }

    pub fn only_hotspots(mut self, only: bool) -> Self {
        self.only_hotspots = only;
        self
    }

    pub fn with_id_info(mut self, include: bool) -> Self {
        self.include_id_info = include;
        self
    }

    pub fn as_json(mut self, as_json: bool) -> Self {
        self.as_json = as_json;
        self
    }

    pub fn max_results(mut self, max: u32) -> Self {
        self.max_results = Some(max);
        self
    }

    pub fn include_provisional(mut self, include: bool) -> Self {
        self.include_provisional = include;
        self
    }

    /// `days_back` must be 1..=30 and `max_results` 1..=10000
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DAYS_BACK..=MAX_DAYS_BACK).contains(&self.days_back) {
            return Err(PlannerError::InvalidParameter {
                name: "days_back",
                value: self.days_back.to_string(),
            });
        }
        if let Some(max) = self.max_results {
            if !(1..=MAX_RESULTS_LIMIT).contains(&max) {
                return Err(PlannerError::InvalidParameter {
                    name: "max_results",
                    value: max.to_string(),
                });
            }
        }
        Ok(())
    }

    fn params(&self, locations: Vec<String>) -> ObservationParams {
        ObservationParams {
            back: self.days_back,
            hotspot: self.only_hotspots,
            max_results: self.max_results,
            include_provisional: self.include_provisional,
            locations,
        }
    }
}

/// Which observation endpoint a query hits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFlavor {
    Recent,
    Notable,
    Species(SpeciesRef),
}

impl QueryFlavor {
    fn label(&self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Notable => "notable",
            Self::Species(_) => "species",
        }
    }
}

/// A species given by its eBird code (`amewoo`) or by common name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesRef {
    Code(String),
    /// Resolved against the target's recent observations, ignoring case
    CommonName(String),
}

impl SpeciesRef {
    /// Rejects a blank code or common name
    pub fn validate(&self) -> Result<()> {
        let (name, value) = match self {
            Self::Code(code) => ("species_code", code),
            Self::CommonName(common_name) => ("species_name", common_name),
        };
        if value.trim().is_empty() {
            return Err(PlannerError::InvalidParameter {
                name,
                value: format!("'{}' (blank)", value),
            });
        }
        Ok(())
    }
}

/// A target reduced to what the observation endpoints need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Region or location code used in the request path
    pub region_code: String,
    /// Codes sent as `r`; non-empty only for multi-location targets
    pub locations: Vec<String>,
    /// Human-readable name of the target, for messages
    pub label: String,
}

/// Composes and runs observation requests
pub struct ObservationQuery {
    api: Arc<EbirdClient>,
    resolver: Arc<RegionResolver>,
    species_pages: Arc<SpeciesPageClient>,
    id_info_concurrency: usize,
}

impl ObservationQuery {
    pub fn new(
        api: Arc<EbirdClient>,
        resolver: Arc<RegionResolver>,
        species_pages: Arc<SpeciesPageClient>,
    ) -> Self {
        Self {
            api,
            resolver,
            species_pages,
            id_info_concurrency: DEFAULT_ID_INFO_CONCURRENCY,
        }
    }

    /// Number of species pages scraped at once
    pub fn with_id_info_concurrency(mut self, concurrency: usize) -> Self {
        self.id_info_concurrency = concurrency.max(1);
        self
    }

    /// Run a query and shape the records as a table or JSON per `options.as_json`
    pub async fn fetch(
        &self,
        flavor: &QueryFlavor,
        target: &ObservationTarget,
        options: &QueryOptions,
    ) -> Result<QueryOutput> {
        let records = self.fetch_records(flavor, target, options).await?;
        QueryOutput::build(&records, &OBSERVATION_COLUMNS, options.as_json)
    }

    /// Run a query and return the normalized records
    pub async fn fetch_records(
        &self,
        flavor: &QueryFlavor,
        target: &ObservationTarget,
        options: &QueryOptions,
    ) -> Result<Vec<ObservationRecord>> {
        options.validate()?;
        if let QueryFlavor::Species(species) = flavor {
            species.validate()?;
        }

        let resolved = self.resolve_target(target).await?;
        let params = options.params(resolved.locations.clone());
        let region = resolved.region_code.as_str();

        let mut records = match flavor {
            QueryFlavor::Recent => {
                normalize(self.api.recent_observations(region, &params).await?, false)
            }
            QueryFlavor::Notable => {
                let mut records =
                    normalize(self.api.notable_observations(region, &params).await?, true);
                dedupe_sightings(&mut records);
                records
            }
            QueryFlavor::Species(species) => {
                let species_code = self.species_code(species, &resolved, &params).await?;
                normalize(
                    self.api
                        .species_observations(region, &species_code, &params)
                        .await?,
                    false,
                )
            }
        };

        if options.include_id_info {
            attach_id_info(&self.species_pages, &mut records, self.id_info_concurrency).await?;
        }

        info!(
            flavor = flavor.label(),
            region = %resolved.region_code,
            records = records.len(),
            "Fetched observations"
        );

        Ok(records)
    }

    /// Turn a target into the code for the request path
    pub async fn resolve_target(&self, target: &ObservationTarget) -> Result<ResolvedTarget> {
        let resolved = match target {
            ObservationTarget::Hotspot { name, scope } => ResolvedTarget {
                region_code: self.resolver.hotspot_code(name, scope).await?,
                locations: Vec::new(),
                label: name.clone(),
            },
            ObservationTarget::Substate { name } => ResolvedTarget {
                region_code: self.resolver.substate_code(name).await?,
                locations: Vec::new(),
                label: name.clone(),
            },
            ObservationTarget::Region(level) => {
                let context = self.resolver.context();
                let label = match level {
                    RegionLevel::Country => context.country_name(),
                    _ => context.state_name(),
                }
                .unwrap_or_default()
                .to_string();
                ResolvedTarget {
                    region_code: self.resolver.region_code(*level, None).await?,
                    locations: Vec::new(),
                    label,
                }
            }
            ObservationTarget::MultiLocation(codes) => {
                check_locations(codes)?;
                ResolvedTarget {
                    region_code: codes[0].clone(),
                    locations: codes.clone(),
                    label: codes.join(", "),
                }
            }
        };

        debug!(target = %resolved.label, region = %resolved.region_code, "Resolved query target");
        Ok(resolved)
    }

    async fn species_code(
        &self,
        species: &SpeciesRef,
        resolved: &ResolvedTarget,
        params: &ObservationParams,
    ) -> Result<String> {
        let name = match species {
            SpeciesRef::Code(code) => return Ok(code.trim().to_string()),
            SpeciesRef::CommonName(name) => name,
        };

        // The caller's result cap applies to the species query, not the name search
        let lookup = ObservationParams {
            max_results: None,
            ..params.clone()
        };
        let wanted = name.trim().to_lowercase();
        let recent = self
            .api
            .recent_observations(&resolved.region_code, &lookup)
            .await?;

        recent
            .into_iter()
            .find(|obs| obs.com_name.to_lowercase() == wanted)
            .map(|obs| obs.species_code)
            .ok_or_else(|| PlannerError::SpeciesNotFound {
                name: name.clone(),
                target: resolved.label.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_back_bounds() {
        assert!(QueryOptions::default().days_back(1).validate().is_ok());
        assert!(QueryOptions::default().days_back(30).validate().is_ok());
        for bad in [0, 31] {
            match QueryOptions::default().days_back(bad).validate() {
                Err(PlannerError::InvalidParameter { name, value }) => {
                    assert_eq!(name, "days_back");
                    assert_eq!(value, bad.to_string());
                }
                other => panic!("expected InvalidParameter, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_default_options() {
        let options = QueryOptions::default();
        assert_eq!(options.days_back, 14);
        assert!(!options.only_hotspots);
        assert!(!options.include_id_info);
        assert!(!options.as_json);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_max_results_bounds() {
        assert!(QueryOptions::default().max_results(10_000).validate().is_ok());
        assert!(QueryOptions::default().max_results(0).validate().is_err());
        assert!(QueryOptions::default().max_results(10_001).validate().is_err());
    }

    #[test]
    fn test_params_mapping() {
        let params = QueryOptions::default()
            .days_back(7)
            .only_hotspots(true)
            .params(vec!["L1".to_string()]);
        assert_eq!(params.back, 7);
        assert!(params.hotspot);
        assert_eq!(params.locations, vec!["L1"]);
    }

    #[test]
    fn test_blank_species_rejected() {
        assert!(SpeciesRef::Code("amewoo".to_string()).validate().is_ok());
        assert!(matches!(
            SpeciesRef::Code(" ".to_string()).validate(),
            Err(PlannerError::InvalidParameter { name: "species_code", .. })
        ));
        assert!(matches!(
            SpeciesRef::CommonName(String::new()).validate(),
            Err(PlannerError::InvalidParameter { name: "species_name", .. })
        ));
    }

    fn codes(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("L{}", i)).collect()
    }

    #[test]
    fn test_ten_locations_accepted() {
        let target = ObservationTarget::multi_location(codes(10)).unwrap();
        assert!(matches!(target, ObservationTarget::MultiLocation(ref c) if c.len() == 10));
    }

    #[test]
    fn test_eleven_locations_rejected() {
        assert!(matches!(
            ObservationTarget::multi_location(codes(11)),
            Err(PlannerError::TooManyLocations { count: 11, max: 10 })
        ));
    }

    #[test]
    fn test_empty_and_blank_locations_rejected() {
        assert!(ObservationTarget::multi_location(Vec::new()).is_err());
        let with_blank = vec!["L1".to_string(), " ".to_string()];
        assert!(ObservationTarget::multi_location(with_blank).is_err());
    }

    #[test]
    fn test_locations_take_priority() {
        let selection = TargetSelection {
            hotspot_name: Some("Prospect Park".to_string()),
            substate_name: Some("Kings".to_string()),
            region_type: None,
            locations: vec!["L1".to_string(), "L2".to_string()],
        };
        assert_eq!(
            ObservationTarget::select(selection).unwrap(),
            ObservationTarget::MultiLocation(vec!["L1".to_string(), "L2".to_string()])
        );
    }

    #[test]
    fn test_hotspot_beats_substate() {
        let selection = TargetSelection::hotspot("Prospect Park").in_substate("Kings");
        assert_eq!(
            ObservationTarget::select(selection).unwrap(),
            ObservationTarget::Hotspot {
                name: "Prospect Park".to_string(),
                scope: HotspotScope::Substate("Kings".to_string()),
            }
        );
    }

    #[test]
    fn test_hotspot_defaults_to_state_scope() {
        assert_eq!(
            ObservationTarget::select(TargetSelection::hotspot("Prospect Park")).unwrap(),
            ObservationTarget::Hotspot {
                name: "Prospect Park".to_string(),
                scope: HotspotScope::State,
            }
        );
    }

    #[test]
    fn test_hotspot_at_country_level_rejected() {
        let selection = TargetSelection::hotspot("Prospect Park").at_level(RegionLevel::Country);
        assert!(ObservationTarget::select(selection).is_err());
    }

    #[test]
    fn test_substate_beats_region() {
        assert_eq!(
            ObservationTarget::select(TargetSelection::substate("Kings")).unwrap(),
            ObservationTarget::Substate {
                name: "Kings".to_string()
            }
        );
    }

    #[test]
    fn test_substate_with_state_level_rejected() {
        let selection = TargetSelection::substate("Kings").at_level(RegionLevel::State);
        assert!(matches!(
            ObservationTarget::select(selection),
            Err(PlannerError::InvalidParameter { name: "region_type", .. })
        ));
    }

    #[test]
    fn test_region_defaults_to_state() {
        assert_eq!(
            ObservationTarget::select(TargetSelection::default()).unwrap(),
            ObservationTarget::Region(RegionLevel::State)
        );
        assert_eq!(
            ObservationTarget::select(TargetSelection::region(RegionLevel::Country)).unwrap(),
            ObservationTarget::Region(RegionLevel::Country)
        );
    }

    #[test]
    fn test_substate_level_without_name_rejected() {
        assert!(ObservationTarget::select(TargetSelection::region(RegionLevel::Substate)).is_err());
    }
}
