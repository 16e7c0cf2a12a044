use thiserror::Error;

use crate::request::TravelMode;

/// Terminal failures of a route resolution, as seen by the caller.
///
/// Provider-level failure detail is aggregated before it reaches this type:
/// a single provider failing is never terminal on its own, so the caller
/// only ever observes the pre-flight rejections, the route-absence case and
/// the combined failure of both providers.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    #[error("origin and destination are too close to route between")]
    TooClose,

    #[error("no route found for {mode}: {message}")]
    NoRouteForMode { mode: TravelMode, message: String },

    #[error("both providers failed (modern: {modern}; legacy: {legacy})")]
    BothProvidersFailed { modern: String, legacy: String },
}
