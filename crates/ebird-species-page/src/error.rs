use std::fmt;

/// Errors from the species page scraper
#[derive(Debug)]
pub enum SpeciesPageError {
    Http(reqwest::Error),
    Upstream { status: u16, url: String },
    /// The page is missing, or has no identification paragraph
    IdInfoNotFound { species_code: String },
}

impl fmt::Display for SpeciesPageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Upstream { status, url } => {
                write!(f, "Species page returned status {status} for {url}")
            }
            Self::IdInfoNotFound { species_code } => {
                write!(f, "No identification info found for species '{species_code}'")
            }
        }
    }
}

impl std::error::Error for SpeciesPageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SpeciesPageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, SpeciesPageError>;
