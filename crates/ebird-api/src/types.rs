//! Data types for eBird API requests and responses
//!
//! Response structs mirror the JSON the API returns. Fields the API omits for
//! some records (scientific name, counts reported as "X") are optional.

use serde::{Deserialize, Serialize};

/// One entry of a reference region list (`/ref/region/list/...`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEntry {
    pub code: String,
    pub name: String,
}

/// One hotspot from `/ref/hotspot/{regionCode}?fmt=json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotEntry {
    pub loc_id: String,
    pub loc_name: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub subnational1_code: Option<String>,
    #[serde(default)]
    pub subnational2_code: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub latest_obs_dt: Option<String>,
    #[serde(default)]
    pub num_species_all_time: Option<u32>,
}

/// One observation from the `/data/obs/...` endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub species_code: String,
    pub com_name: String,
    #[serde(default)]
    pub sci_name: Option<String>,
    pub loc_id: String,
    pub loc_name: String,
    pub obs_dt: String,
    #[serde(default)]
    pub how_many: Option<u32>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub obs_valid: Option<bool>,
    #[serde(default)]
    pub obs_reviewed: Option<bool>,
    #[serde(default)]
    pub location_private: Option<bool>,
    #[serde(default)]
    pub sub_id: Option<String>,
}

/// Query parameters shared by the observation endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationParams {
    /// Days to look back (`back`)
    pub back: u32,
    /// Only observations from hotspots (`hotspot`)
    pub hotspot: bool,
    /// Cap on returned rows (`maxResults`)
    pub max_results: Option<u32>,
    /// Include unreviewed observations (`includeProvisional`)
    pub include_provisional: bool,
    /// Explicit location list (`r`), at most 10 codes
    pub locations: Vec<String>,
}

impl Default for ObservationParams {
    fn default() -> Self {
        Self {
            back: 14,
            hotspot: false,
            max_results: None,
            include_provisional: false,
            locations: Vec::new(),
        }
    }
}

impl ObservationParams {
    /// Render as a URL query string (without the leading `?`)
    pub fn query_string(&self) -> String {
        let mut query = format!("back={}&hotspot={}", self.back, self.hotspot);
        if let Some(max) = self.max_results {
            query.push_str(&format!("&maxResults={}", max));
        }
        if self.include_provisional {
            query.push_str("&includeProvisional=true");
        }
        if !self.locations.is_empty() {
            let codes: Vec<String> = self
                .locations
                .iter()
                .map(|code| urlencoding::encode(code).into_owned())
                .collect();
            query.push_str(&format!("&r={}", codes.join(",")));
        }
        query
    }
}
