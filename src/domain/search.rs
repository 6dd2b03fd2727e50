use serde::Serialize;
use thiserror::Error;
use url::Url;

use super::lead::Lead;

pub const RATE_LIMIT_MESSAGE: &str = "API Rate Limit Exceeded. The system is currently receiving too many requests. Please wait a moment and try again.";
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unexpected error occurred while connecting to Google Gemini.";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    pub location: String,
    pub niche: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("Please enter a location.")]
    MissingLocation,
    #[error("Please enter a niche.")]
    MissingNiche,
}

impl SearchParams {
    pub fn parse(location: &str, niche: &str) -> Result<Self, InputError> {
        let location = location.trim();
        let niche = niche.trim();

        if location.is_empty() {
            return Err(InputError::MissingLocation);
        }
        if niche.is_empty() {
            return Err(InputError::MissingNiche);
        }

        Ok(SearchParams {
            location: location.to_string(),
            niche: niche.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundingSource {
    pub title: String,
    pub url: String,
}

impl GroundingSource {
    pub fn favicon_url(&self) -> Option<String> {
        let parsed_url = Url::parse(&self.url).ok()?;
        match parsed_url.host_str() {
            Some("") | None => None,
            Some(host) => Some(format!(
                "https://www.google.com/s2/favicons?domain={}",
                host
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub leads: Vec<Lead>,
    pub raw_text: String,
    pub sources: Vec<GroundingSource>,
}

/// What a failed search reports to the caller. Every upstream failure ends
/// up as exactly one of these.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryError {
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,
    #[error("{0}")]
    Unknown(String),
}

impl QueryError {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::RateLimited => "rate_limited",
            QueryError::Unknown(_) => "unknown",
        }
    }
}
