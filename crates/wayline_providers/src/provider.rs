use serde::Serialize;
use thiserror::Error;

/// Which upstream produced a response. Provenance is all-or-nothing per
/// resolution; alternatives from the two providers are never mixed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Modern,
    Legacy,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Provider::Modern => "modern",
                Provider::Legacy => "legacy",
            }
        )
    }
}

/// Per-attempt failure of a single provider call. Stays inside the
/// resolver; the caller only ever sees the aggregated [`RouteError`]
/// built from these.
///
/// [`RouteError`]: wayline_core::RouteError
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("provider rejected request: {status} - {message}")]
    Rejected { status: String, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("no routes: {0}")]
    NoRoutes(String),
}

impl ProviderError {
    /// True when the provider answered cleanly but had no route to offer,
    /// the only failure kind the driving retry can recover from.
    pub fn is_route_absence(&self) -> bool {
        matches!(self, ProviderError::NoRoutes(_))
    }
}
