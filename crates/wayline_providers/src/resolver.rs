use tracing::warn;

use wayline_core::error::RouteError;
use wayline_core::request::{RouteRequest, TravelMode};
use wayline_core::route::RouteAlternative;

use crate::legacy::{LegacyDirectionsClient, LegacyDirectionsClientParams};
use crate::modern::{ModernRoutesClient, ModernRoutesClientParams};
use crate::provider::{Provider, ProviderError};

/// Planar separation (degrees) below which two endpoints are considered
/// degenerate-close and no provider is contacted. A design knob on the
/// order of 100 meters, not a physical distance.
pub const MIN_PLANAR_SEPARATION: f64 = 1e-3;

pub struct RouteResolverParams {
    pub modern: ModernRoutesClientParams,
    pub legacy: LegacyDirectionsClientParams,
}

/// The travel mode was silently downgraded to driving after the requested
/// mode produced no routes. Carried alongside the result so the caller can
/// tell the user, distinctly from a hard failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSwitch {
    pub from: TravelMode,
    pub reason: String,
}

#[derive(Debug)]
pub struct RouteResolution {
    pub alternatives: Vec<RouteAlternative>,
    pub provider: Provider,
    pub mode_switched: Option<ModeSwitch>,
}

/// Both providers failed for one attempt. Never leaves the resolver as-is;
/// it either triggers the driving retry or collapses into a terminal
/// [`RouteError`].
struct AggregateFailure {
    modern: ProviderError,
    legacy: ProviderError,
}

impl AggregateFailure {
    /// The recoverable case: at least one provider answered cleanly with
    /// zero routes for the requested mode.
    fn route_absence_message(&self) -> Option<&str> {
        match (&self.modern, &self.legacy) {
            (ProviderError::NoRoutes(message), _) => Some(message),
            (_, ProviderError::NoRoutes(message)) => Some(message),
            _ => None,
        }
    }

    fn into_terminal(self, mode: TravelMode) -> RouteError {
        match self.route_absence_message() {
            Some(message) => RouteError::NoRouteForMode {
                mode,
                message: message.to_string(),
            },
            None => RouteError::BothProvidersFailed {
                modern: self.modern.to_string(),
                legacy: self.legacy.to_string(),
            },
        }
    }
}

/// The sole route-resolution entry point: modern provider first, legacy on
/// failure, one driving retry when the requested mode has no routes.
pub struct RouteResolver {
    modern: ModernRoutesClient,
    legacy: LegacyDirectionsClient,
}

impl RouteResolver {
    pub fn new(params: RouteResolverParams) -> RouteResolver {
        RouteResolver {
            modern: ModernRoutesClient::new(params.modern),
            legacy: LegacyDirectionsClient::new(params.legacy),
        }
    }

    pub async fn resolve(&self, request: &RouteRequest) -> Result<RouteResolution, RouteError> {
        validate(request)?;

        if request.origin.planar_separation(&request.destination) < MIN_PLANAR_SEPARATION {
            return Err(RouteError::TooClose);
        }

        let failure = match self.try_providers(request).await {
            Ok((alternatives, provider)) => {
                return Ok(RouteResolution {
                    alternatives,
                    provider,
                    mode_switched: None,
                });
            }
            Err(failure) => failure,
        };

        // Single-shot mode fallback: a route-absence failure in any
        // non-driving mode earns exactly one retry as driving.
        let reason = match failure.route_absence_message() {
            Some(reason) if request.mode != TravelMode::Drive => reason.to_string(),
            _ => return Err(failure.into_terminal(request.mode)),
        };

        warn!(
            "no routes for mode {}, retrying as {}",
            request.mode,
            TravelMode::Drive
        );

        let driving = RouteRequest {
            mode: TravelMode::Drive,
            ..request.clone()
        };

        match self.try_providers(&driving).await {
            Ok((alternatives, provider)) => Ok(RouteResolution {
                alternatives,
                provider,
                mode_switched: Some(ModeSwitch {
                    from: request.mode,
                    reason,
                }),
            }),
            Err(failure) => Err(failure.into_terminal(TravelMode::Drive)),
        }
    }

    /// One full provider pass. The legacy attempt only starts after the
    /// modern one has failed; the two are never raced, and a response is
    /// always the work of exactly one provider.
    async fn try_providers(
        &self,
        request: &RouteRequest,
    ) -> Result<(Vec<RouteAlternative>, Provider), AggregateFailure> {
        let modern_failure = match self.modern.fetch_routes(request).await {
            Ok(alternatives) => return Ok((alternatives, Provider::Modern)),
            Err(err) => {
                warn!("modern provider failed ({err}), falling back to legacy directions");
                err
            }
        };

        match self.legacy.fetch_routes(request).await {
            Ok(alternatives) => Ok((alternatives, Provider::Legacy)),
            Err(legacy_failure) => Err(AggregateFailure {
                modern: modern_failure,
                legacy: legacy_failure,
            }),
        }
    }
}

fn validate(request: &RouteRequest) -> Result<(), RouteError> {
    if !request.origin.is_valid() {
        return Err(RouteError::InvalidRequest("origin is not a valid coordinate".to_string()));
    }
    if !request.destination.is_valid() {
        return Err(RouteError::InvalidRequest(
            "destination is not a valid coordinate".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_core::latlng::LatLng;

    #[test]
    fn aggregate_failure_prefers_route_absence() {
        let failure = AggregateFailure {
            modern: ProviderError::NoRoutes("nothing for walking".to_string()),
            legacy: ProviderError::Api {
                status: 500,
                message: "boom".to_string(),
            },
        };

        assert_eq!(failure.route_absence_message(), Some("nothing for walking"));
        assert!(matches!(
            failure.into_terminal(TravelMode::Walk),
            RouteError::NoRouteForMode {
                mode: TravelMode::Walk,
                ..
            }
        ));
    }

    #[test]
    fn aggregate_failure_without_route_absence_is_both_failed() {
        let failure = AggregateFailure {
            modern: ProviderError::Api {
                status: 500,
                message: "modern down".to_string(),
            },
            legacy: ProviderError::Rejected {
                status: "REQUEST_DENIED".to_string(),
                message: "bad key".to_string(),
            },
        };

        let err = failure.into_terminal(TravelMode::Drive);
        match err {
            RouteError::BothProvidersFailed { modern, legacy } => {
                assert!(modern.contains("modern down"));
                assert!(legacy.contains("bad key"));
            }
            other => panic!("expected BothProvidersFailed, got {other:?}"),
        }
    }

    #[test]
    fn guard_threshold_separates_close_from_routable() {
        let origin = LatLng::new(50.85, 4.35);

        // ~100km apart is far beyond the guard.
        let far = LatLng::new(51.75, 4.35);
        assert!(origin.planar_separation(&far) >= MIN_PLANAR_SEPARATION);

        assert!(origin.planar_separation(&origin) < MIN_PLANAR_SEPARATION);
    }
}
