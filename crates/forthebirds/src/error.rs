//! Error types for the trip planner

use std::fmt;

use crate::region::LookupLevel;

#[derive(Debug)]
pub enum PlannerError {
    /// Name absent from the reference list for its level
    RegionNotFound { name: String, level: LookupLevel },
    /// Name matches more than one entry of the reference list
    AmbiguousRegion {
        name: String,
        level: LookupLevel,
        codes: Vec<String>,
    },
    /// A lookup needs a country or state name the context was built without
    MissingContext { level: LookupLevel },
    /// Option or selection outside what the API accepts
    InvalidParameter { name: &'static str, value: String },
    /// More locations than the API accepts in one request
    TooManyLocations { count: usize, max: usize },
    /// Non-success status from the eBird API
    Upstream { status: u16, endpoint: String },
    /// Species page or its identification paragraph is missing
    IdInfoNotFound { species_code: String },
    /// Common name not present among the target's recent observations
    SpeciesNotFound { name: String, target: String },
    /// Transport or decoding failure talking to the eBird API
    Api(ebird_api::EbirdError),
    /// Transport failure fetching a species page
    SpeciesPage(ebird_species_page::SpeciesPageError),
    /// Failed to build JSON output
    Serialization(serde_json::Error),
    /// Configuration error
    Config(String),
}

impl fmt::Display for PlannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegionNotFound { name, level } => write!(
                f,
                "'{}' does not exist within the {} list; list the {} names to see supported values",
                name, level, level
            ),
            Self::AmbiguousRegion { name, level, codes } => write!(
                f,
                "'{}' matches {} entries in the {} list ({}); narrow the search",
                name,
                codes.len(),
                level,
                codes.join(", ")
            ),
            Self::MissingContext { level } => {
                write!(f, "Planner was created without a {} name", level)
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "Invalid value for {}: {}", name, value)
            }
            Self::TooManyLocations { count, max } => write!(
                f,
                "{} locations given but at most {} are allowed per request",
                count, max
            ),
            Self::Upstream { status, endpoint } => {
                write!(f, "eBird API returned status {} for {}", status, endpoint)
            }
            Self::IdInfoNotFound { species_code } => {
                write!(f, "No identification info found for species '{}'", species_code)
            }
            Self::SpeciesNotFound { name, target } => {
                write!(f, "No recent observations of {} in {}", name, target)
            }
            Self::Api(e) => write!(f, "{}", e),
            Self::SpeciesPage(e) => write!(f, "{}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for PlannerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::SpeciesPage(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ebird_api::EbirdError> for PlannerError {
    fn from(e: ebird_api::EbirdError) -> Self {
        match e {
            ebird_api::EbirdError::Upstream { status, endpoint } => {
                Self::Upstream { status, endpoint }
            }
            ebird_api::EbirdError::MissingToken => Self::Config("API token is empty".to_string()),
            other => Self::Api(other),
        }
    }
}

impl From<ebird_species_page::SpeciesPageError> for PlannerError {
    fn from(e: ebird_species_page::SpeciesPageError) -> Self {
        match e {
            ebird_species_page::SpeciesPageError::IdInfoNotFound { species_code } => {
                Self::IdInfoNotFound { species_code }
            }
            ebird_species_page::SpeciesPageError::Upstream { status, url } => Self::Upstream {
                status,
                endpoint: url,
            },
            other => Self::SpeciesPage(other),
        }
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<tracing_subscriber::filter::ParseError> for PlannerError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
