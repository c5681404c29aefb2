use std::collections::HashSet;

use ebird_api::Observation;
use serde::Serialize;

/// One sighting, flattened from the API's observation JSON
///
/// Serializes with camelCase keys; `count` is `null` when the observer
/// reported presence ("X") instead of a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    pub species_common_name: String,
    pub species_scientific_name: Option<String>,
    pub species_code: String,
    pub location_name: String,
    pub location_code: String,
    pub observation_date: String,
    pub count: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_notable: bool,
    pub id_info: Option<String>,
}

impl ObservationRecord {
    pub fn from_observation(obs: Observation, is_notable: bool) -> Self {
        Self {
            species_common_name: obs.com_name,
            species_scientific_name: obs.sci_name,
            species_code: obs.species_code,
            location_name: obs.loc_name,
            location_code: obs.loc_id,
            observation_date: obs.obs_dt,
            count: obs.how_many,
            latitude: obs.lat,
            longitude: obs.lng,
            is_notable,
            id_info: None,
        }
    }

    fn sighting_key(&self) -> (String, String, String, Option<u32>) {
        (
            self.species_code.clone(),
            self.location_code.clone(),
            self.observation_date.clone(),
            self.count,
        )
    }
}

pub(crate) fn normalize(
    observations: Vec<Observation>,
    is_notable: bool,
) -> Vec<ObservationRecord> {
    observations
        .into_iter()
        .map(|obs| ObservationRecord::from_observation(obs, is_notable))
        .collect()
}

/// Collapse repeated sightings, keeping the first occurrence
///
/// The notable endpoint returns one row per checklist that reported a
/// sighting, so the same bird at the same place and time repeats.
pub(crate) fn dedupe_sightings(records: &mut Vec<ObservationRecord>) {
    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.sighting_key()));
}
