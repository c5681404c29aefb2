use crate::error::{PlannerError, Result};

/// Per-session state shared by every lookup and query
///
/// Country and state are human-readable labels ("United States", "New York"),
/// never codes. They are resolved on demand by the region resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    token: String,
    country_name: String,
    state_name: String,
}

impl ClientContext {
    pub fn new(token: &str, country_name: &str, state_name: &str) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(PlannerError::Config(
                "an eBird API token is required (https://ebird.org/api/keygen)".to_string(),
            ));
        }

        Ok(Self {
            token: token.to_string(),
            country_name: country_name.trim().to_string(),
            state_name: state_name.trim().to_string(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Country label, `None` when the context was built without one
    pub fn country_name(&self) -> Option<&str> {
        Some(self.country_name.as_str()).filter(|s| !s.is_empty())
    }

    /// State label, `None` when the context was built without one
    pub fn state_name(&self) -> Option<&str> {
        Some(self.state_name.as_str()).filter(|s| !s.is_empty())
    }
}
