//! forthebirds: birding trip planning over the eBird API
//!
//! Turns place names ("United States" / "New York" / "Kings" /
//! "Prospect Park") into the region and location codes eBird expects, then
//! fetches recent, notable, or single-species sightings as a table or JSON,
//! optionally with identification text scraped from each species' page.
//!
//! Resolution is lazy and layered: every query resolves the country, then the
//! state, then the substate or hotspot it needs, failing with the offending
//! name as soon as one is missing or ambiguous.

mod config;
mod context;
mod error;
mod id_info;
pub mod logging;
mod output;
mod planner;
mod query;
mod record;
mod region;
mod resolver;

pub use config::{PlannerConfig, DEFAULT_API_URL, DEFAULT_SPECIES_URL};
pub use context::ClientContext;
pub use error::{PlannerError, Result};
pub use output::{cell_text, QueryOutput, Table, HOTSPOT_COLUMNS, OBSERVATION_COLUMNS};
pub use planner::TripPlanner;
pub use query::{
    ObservationQuery, ObservationTarget, QueryFlavor, QueryOptions, ResolvedTarget, SpeciesRef,
    TargetSelection, DEFAULT_DAYS_BACK, MAX_DAYS_BACK, MAX_LOCATIONS, MAX_RESULTS_LIMIT,
    MIN_DAYS_BACK,
};
pub use record::ObservationRecord;
pub use region::{resolve_code, Hotspot, HotspotScope, LookupLevel, Named, Region, RegionLevel};
pub use resolver::RegionResolver;
