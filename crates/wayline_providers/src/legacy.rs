use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use wayline_core::polyline;
use wayline_core::request::{RouteRequest, TravelMode};
use wayline_core::route::RouteAlternative;

use crate::modern::DEFAULT_ATTEMPT_TIMEOUT;
use crate::provider::ProviderError;

pub const LEGACY_DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

const AVOID_SEPARATOR: &str = "|";

pub struct LegacyDirectionsClientParams {
    pub api_key: String,
    pub endpoint: String,
    pub language: String,
    pub timeout: Duration,
}

impl LegacyDirectionsClientParams {
    pub fn new(api_key: String) -> LegacyDirectionsClientParams {
        LegacyDirectionsClientParams {
            api_key,
            endpoint: LEGACY_DIRECTIONS_API_URL.to_string(),
            language: "en".to_string(),
            timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    status: String,
    error_message: Option<String>,

    #[serde(default)]
    routes: Vec<LegacyRoute>,
}

#[derive(Deserialize)]
struct LegacyRoute {
    #[serde(default)]
    legs: Vec<LegacyLeg>,
    overview_polyline: Option<OverviewPolyline>,
    summary: Option<String>,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct LegacyLeg {
    distance: Option<TextValue>,
    duration: Option<TextValue>,
    duration_in_traffic: Option<TextValue>,
}

/// The legacy API ships every quantity pre-formatted next to its raw
/// value. The text is kept authoritative downstream to avoid rounding a
/// second time.
#[derive(Deserialize)]
struct TextValue {
    text: String,
    value: f64,
}

/// Client for the legacy GET/query-string directions API.
pub struct LegacyDirectionsClient {
    params: LegacyDirectionsClientParams,
    client: reqwest::Client,
}

impl LegacyDirectionsClient {
    pub fn new(params: LegacyDirectionsClientParams) -> LegacyDirectionsClient {
        LegacyDirectionsClient {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteAlternative>, ProviderError> {
        let mut query: Vec<(&str, String)> = vec![
            ("origin", coordinate_pair(request.origin.into())),
            ("destination", coordinate_pair(request.destination.into())),
            ("mode", request.mode.to_string()),
            ("alternatives", request.alternatives.to_string()),
            ("key", self.params.api_key.clone()),
            ("language", self.params.language.clone()),
        ];

        if !request.avoid.is_empty() {
            let avoid = request
                .avoid
                .iter()
                .map(|feature| feature.to_string())
                .collect::<Vec<_>>()
                .join(AVOID_SEPARATOR);
            query.push(("avoid", avoid));
        }

        // Traffic-aware timing only applies to driving.
        if request.mode == TravelMode::Drive {
            query.push(("departure_time", "now".to_string()));
        }

        debug!(
            "LegacyDirectionsApi: requesting directions for mode {}",
            request.mode
        );

        let response = self
            .client
            .get(&self.params.endpoint)
            .timeout(self.params.timeout)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api { status, message });
        }

        let parsed: DirectionsResponse = response.json().await?;

        // Success predicate: a non-empty routes array. The status field is
        // only consulted for the provider's own error message.
        if parsed.routes.is_empty() {
            let message = parsed
                .error_message
                .unwrap_or_else(|| format!("no routes for mode {}", request.mode));

            return if parsed.status == "ZERO_RESULTS" || parsed.status == "OK" {
                Err(ProviderError::NoRoutes(message))
            } else {
                Err(ProviderError::Rejected {
                    status: parsed.status,
                    message,
                })
            };
        }

        parsed
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| normalize_route(index, route))
            .collect()
    }
}

/// Comma-joined `lat,lng` pair in the legacy wire form.
fn coordinate_pair(point: geo_types::Point) -> String {
    format!("{},{}", point.y(), point.x())
}

fn normalize_route(index: usize, route: LegacyRoute) -> Result<RouteAlternative, ProviderError> {
    // Origin-to-destination requests always carry exactly one leg.
    let leg = route.legs.into_iter().next().ok_or_else(|| {
        ProviderError::InvalidResponse(format!("route {index} carries no legs"))
    })?;

    let distance = leg.distance.ok_or_else(|| {
        ProviderError::InvalidResponse(format!("route {index} is missing its distance"))
    })?;
    let duration = leg.duration.ok_or_else(|| {
        ProviderError::InvalidResponse(format!("route {index} is missing its duration"))
    })?;

    let encoded = route
        .overview_polyline
        .map(|polyline| polyline.points)
        .filter(|points| !points.is_empty())
        .ok_or_else(|| {
            ProviderError::InvalidResponse(format!("route {index} is missing its polyline"))
        })?;

    let geometry = polyline::decode(&encoded)
        .map_err(|err| ProviderError::InvalidResponse(format!("route {index}: {err}")))?;

    Ok(RouteAlternative {
        geometry,
        distance_meters: distance.value.round().max(0.0) as u32,
        distance_text: distance.text,
        duration_seconds: duration.value.round().max(0.0) as u32,
        duration_text: duration.text,
        traffic_duration_text: leg.duration_in_traffic.map(|traffic| traffic.text),
        summary: route.summary.unwrap_or_default(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayline_core::latlng::LatLng;

    #[test]
    fn coordinate_pairs_are_lat_then_lng() {
        let pair = coordinate_pair(LatLng::new(50.85, 4.35).into());
        assert_eq!(pair, "50.85,4.35");
    }

    #[test]
    fn normalization_keeps_provider_text_authoritative() {
        let route = LegacyRoute {
            legs: vec![LegacyLeg {
                distance: Some(TextValue {
                    text: "1.4 km".to_string(),
                    value: 1449.0,
                }),
                duration: Some(TextValue {
                    text: "4 mins".to_string(),
                    value: 223.0,
                }),
                duration_in_traffic: Some(TextValue {
                    text: "6 mins".to_string(),
                    value: 355.0,
                }),
            }],
            overview_polyline: Some(OverviewPolyline {
                points: "_p~iF~ps|U_ulLnnqC".to_string(),
            }),
            summary: Some("N275".to_string()),
        };

        let alternative = normalize_route(0, route).unwrap();
        assert_eq!(alternative.distance_text, "1.4 km");
        assert_eq!(alternative.distance_meters, 1449);
        assert_eq!(alternative.duration_text, "4 mins");
        assert_eq!(alternative.duration_seconds, 223);
        assert_eq!(alternative.traffic_duration_text.as_deref(), Some("6 mins"));
        assert_eq!(alternative.geometry.len(), 2);
    }

    #[test]
    fn route_without_legs_is_invalid() {
        let route = LegacyRoute {
            legs: vec![],
            overview_polyline: Some(OverviewPolyline {
                points: "_p~iF~ps|U".to_string(),
            }),
            summary: None,
        };

        let err = normalize_route(0, route).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
