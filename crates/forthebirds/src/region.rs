//! Regions, hotspots, and name→code matching

use std::fmt;
use std::str::FromStr;

use ebird_api::{HotspotEntry, RegionEntry};
use serde::Serialize;

use crate::error::{PlannerError, Result};

/// A country, state, or substate with its eBird region code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub name: String,
    pub code: String,
}

impl From<RegionEntry> for Region {
    fn from(entry: RegionEntry) -> Self {
        Self {
            name: entry.name,
            code: entry.code,
        }
    }
}

/// A named birding location with its own location code
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub name: String,
    pub code: String,
    pub country_code: Option<String>,
    pub state_code: Option<String>,
    pub substate_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub latest_observation_date: Option<String>,
    pub species_count: Option<u32>,
}

impl From<HotspotEntry> for Hotspot {
    fn from(entry: HotspotEntry) -> Self {
        Self {
            name: entry.loc_name,
            code: entry.loc_id,
            country_code: entry.country_code,
            state_code: entry.subnational1_code,
            substate_code: entry.subnational2_code,
            latitude: entry.lat,
            longitude: entry.lng,
            latest_observation_date: entry.latest_obs_dt,
            species_count: entry.num_species_all_time,
        }
    }
}

/// Level of the administrative hierarchy an observation query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionLevel {
    Country,
    #[default]
    State,
    Substate,
}

impl FromStr for RegionLevel {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "country" => Ok(Self::Country),
            "state" => Ok(Self::State),
            "substate" => Ok(Self::Substate),
            other => Err(PlannerError::InvalidParameter {
                name: "region_type",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&LookupLevel::from(*self), f)
    }
}

/// Which reference list a name was looked up in; reported by lookup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupLevel {
    Country,
    State,
    Substate,
    Hotspot,
}

impl From<RegionLevel> for LookupLevel {
    fn from(level: RegionLevel) -> Self {
        match level {
            RegionLevel::Country => Self::Country,
            RegionLevel::State => Self::State,
            RegionLevel::Substate => Self::Substate,
        }
    }
}

impl fmt::Display for LookupLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Country => "country",
            Self::State => "state",
            Self::Substate => "substate",
            Self::Hotspot => "hotspot",
        };
        f.write_str(label)
    }
}

/// Where to look for hotspots: the context's state, or one of its substates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotspotScope {
    State,
    Substate(String),
}

impl HotspotScope {
    /// Build a scope from a region level and an optional substate name
    ///
    /// A substate name forces substate scope; naming one while asking for
    /// state scope is rejected, as is country scope.
    pub fn from_level(level: RegionLevel, substate: Option<&str>) -> Result<Self> {
        match (level, substate) {
            (RegionLevel::Country, _) => Err(PlannerError::InvalidParameter {
                name: "region_type",
                value: "country (hotspots are listed per state or substate)".to_string(),
            }),
            (RegionLevel::State, Some(name)) => Err(PlannerError::InvalidParameter {
                name: "region_type",
                value: format!("state (substate '{}' given)", name),
            }),
            (RegionLevel::State, None) => Ok(Self::State),
            (RegionLevel::Substate, Some(name)) => Ok(Self::Substate(name.to_string())),
            (RegionLevel::Substate, None) => Err(PlannerError::InvalidParameter {
                name: "substate_name",
                value: "<missing> (required for substate scope)".to_string(),
            }),
        }
    }
}

/// Anything with a display name and a service-assigned code
pub trait Named {
    fn name(&self) -> &str;
    fn code(&self) -> &str;
}

impl Named for Region {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.code
    }
}

impl Named for Hotspot {
    fn name(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &str {
        &self.code
    }
}

/// Find the code for `name` in a reference list
///
/// Matching is exact on the whole trimmed name but ignores case, so
/// " new york" finds "New York". No match is [`PlannerError::RegionNotFound`];
/// more than one match is [`PlannerError::AmbiguousRegion`] listing every
/// candidate code.
pub fn resolve_code<T: Named>(
    name: &str,
    reference_list: &[T],
    level: LookupLevel,
) -> Result<String> {
    let wanted = name.trim().to_lowercase();
    let mut matches = reference_list
        .iter()
        .filter(|entry| entry.name().trim().to_lowercase() == wanted)
        .map(|entry| entry.code().to_string());

    let first = matches.next().ok_or_else(|| PlannerError::RegionNotFound {
        name: name.to_string(),
        level,
    })?;

    let rest: Vec<String> = matches.collect();
    if rest.is_empty() {
        return Ok(first);
    }

    let mut codes = vec![first];
    codes.extend(rest);
    Err(PlannerError::AmbiguousRegion {
        name: name.to_string(),
        level,
        codes,
    })
}
