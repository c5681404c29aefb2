//! Rust client for the eBird API v2
//!
//! Typed bindings for the reference and observation endpoints used to plan
//! birding trips. Every call needs an API token, which anyone with an eBird
//! account can request at <https://ebird.org/api/keygen>.
//!
//! # Example
//!
//! ```no_run
//! use ebird_api::{EbirdClient, ObservationParams};
//!
//! # async fn example() -> Result<(), ebird_api::EbirdError> {
//! let client = EbirdClient::new("abc123")?;
//!
//! let states = client.subnational1("US").await?;
//! let params = ObservationParams { back: 7, ..Default::default() };
//! let observations = client.recent_observations("US-NY-047", &params).await?;
//! println!("{} states, {} observations", states.len(), observations.len());
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /ref/region/list/country/world`
//! - `GET /ref/region/list/subnational1/{countryCode}`
//! - `GET /ref/region/list/subnational2/{stateCode}`
//! - `GET /ref/hotspot/{regionCode}`
//! - `GET /data/obs/{regionCode}/recent`
//! - `GET /data/obs/{regionCode}/recent/notable`
//! - `GET /data/obs/{regionCode}/recent/{speciesCode}`

mod client;
mod error;
mod types;

pub use client::EbirdClient;
pub use error::{EbirdError, Result};
pub use types::{HotspotEntry, Observation, ObservationParams, RegionEntry};
