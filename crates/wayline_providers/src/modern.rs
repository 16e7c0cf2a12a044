use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use wayline_core::latlng::LatLng;
use wayline_core::polyline;
use wayline_core::request::{AvoidFeature, RouteRequest, TravelMode};
use wayline_core::route::RouteAlternative;
use wayline_core::units;

use crate::provider::ProviderError;

pub const MODERN_ROUTES_API_URL: &str =
    "https://routes.googleapis.com/directions/v2:computeRoutes";

/// Response fields the client actually consumes; everything else is masked
/// out to keep the payload small.
const MODERN_FIELD_MASK: &str =
    "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline,routes.description";

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ModernRoutesClientParams {
    pub api_key: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl ModernRoutesClientParams {
    pub fn new(api_key: String) -> ModernRoutesClientParams {
        ModernRoutesClientParams {
            api_key,
            endpoint: MODERN_ROUTES_API_URL.to_string(),
            timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesBody {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: &'static str,
    compute_alternative_routes: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    route_modifiers: Option<RouteModifiers>,
}

#[derive(Debug, Serialize)]
struct Waypoint {
    location: WaypointLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WaypointLocation {
    lat_lng: WireLatLng,
}

#[derive(Debug, Serialize)]
struct WireLatLng {
    latitude: f64,
    longitude: f64,
}

impl From<LatLng> for Waypoint {
    fn from(point: LatLng) -> Self {
        Waypoint {
            location: WaypointLocation {
                lat_lng: WireLatLng {
                    latitude: point.lat,
                    longitude: point.lng,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteModifiers {
    avoid_tolls: bool,
    avoid_highways: bool,
    avoid_ferries: bool,
}

#[derive(Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<ModernRoute>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModernRoute {
    /// Seconds with a trailing unit marker, e.g. `"165s"`.
    duration: Option<String>,
    distance_meters: Option<u32>,
    polyline: Option<ModernPolyline>,
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModernPolyline {
    encoded_polyline: Option<String>,
}

#[derive(Deserialize)]
struct ModernErrorBody {
    error: Option<ModernErrorDetail>,
}

#[derive(Deserialize)]
struct ModernErrorDetail {
    message: Option<String>,
}

/// Client for the modern JSON/POST routing API.
pub struct ModernRoutesClient {
    params: ModernRoutesClientParams,
    client: reqwest::Client,
}

impl ModernRoutesClient {
    pub fn new(params: ModernRoutesClientParams) -> ModernRoutesClient {
        ModernRoutesClient {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_routes(
        &self,
        request: &RouteRequest,
    ) -> Result<Vec<RouteAlternative>, ProviderError> {
        let body = build_body(request);

        debug!("ModernRoutesApi: computing routes for mode {}", request.mode);

        let response = self
            .client
            .post(&self.params.endpoint)
            .timeout(self.params.timeout)
            .header("X-Goog-Api-Key", &self.params.api_key)
            .header("X-Goog-FieldMask", MODERN_FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status,
                message: extract_error_message(message),
            });
        }

        let parsed: ComputeRoutesResponse = response.json().await?;

        if parsed.routes.is_empty() {
            return Err(ProviderError::NoRoutes(format!(
                "modern provider returned no routes for mode {}",
                request.mode
            )));
        }

        parsed
            .routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| normalize_route(index, route))
            .collect()
    }
}

fn build_body(request: &RouteRequest) -> ComputeRoutesBody {
    ComputeRoutesBody {
        origin: request.origin.into(),
        destination: request.destination.into(),
        travel_mode: modern_mode(request.mode),
        compute_alternative_routes: request.alternatives,
        route_modifiers: build_modifiers(&request.avoid),
    }
}

fn modern_mode(mode: TravelMode) -> &'static str {
    match mode {
        TravelMode::Drive => "DRIVE",
        TravelMode::Walk => "WALK",
        TravelMode::Bicycle => "BICYCLE",
        TravelMode::Transit => "TRANSIT",
    }
}

/// The modifiers object is only sent when at least one avoid is requested.
fn build_modifiers(avoid: &[AvoidFeature]) -> Option<RouteModifiers> {
    if avoid.is_empty() {
        return None;
    }

    Some(RouteModifiers {
        avoid_tolls: avoid.contains(&AvoidFeature::Tolls),
        avoid_highways: avoid.contains(&AvoidFeature::Highways),
        avoid_ferries: avoid.contains(&AvoidFeature::Ferries),
    })
}

/// Validates one route element and normalizes it. A missing polyline,
/// duration or distance fails the whole call; a silently shorter result
/// set would misreport the provider's ranking.
fn normalize_route(index: usize, route: ModernRoute) -> Result<RouteAlternative, ProviderError> {
    let encoded = route
        .polyline
        .and_then(|polyline| polyline.encoded_polyline)
        .filter(|encoded| !encoded.is_empty())
        .ok_or_else(|| {
            ProviderError::InvalidResponse(format!("route {index} is missing its polyline"))
        })?;

    let duration = route.duration.ok_or_else(|| {
        ProviderError::InvalidResponse(format!("route {index} is missing its duration"))
    })?;
    let duration_seconds = parse_seconds(&duration).ok_or_else(|| {
        ProviderError::InvalidResponse(format!("route {index} has unparseable duration {duration:?}"))
    })?;

    let distance_meters = route.distance_meters.ok_or_else(|| {
        ProviderError::InvalidResponse(format!("route {index} is missing distanceMeters"))
    })?;

    let geometry = polyline::decode(&encoded)
        .map_err(|err| ProviderError::InvalidResponse(format!("route {index}: {err}")))?;

    Ok(RouteAlternative {
        geometry,
        distance_meters,
        distance_text: units::format_distance(f64::from(distance_meters)),
        duration_seconds,
        duration_text: units::format_duration(duration_seconds),
        // The minimal field mask carries no traffic-adjusted figure.
        traffic_duration_text: None,
        summary: route.description.unwrap_or_default(),
        index,
    })
}

/// Strips the `"s"` unit marker and parses the seconds value.
fn parse_seconds(duration: &str) -> Option<u32> {
    let seconds: f64 = duration.strip_suffix('s')?.parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(seconds.round() as u32)
    } else {
        None
    }
}

/// Error payloads carry `{"error": {"message": ...}}`; fall back to the raw
/// body when they do not.
fn extract_error_message(body: String) -> String {
    serde_json::from_str::<ModernErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|error| error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RouteRequest {
        RouteRequest::new(
            LatLng::new(50.85, 4.35),
            LatLng::new(51.05, 3.72),
            TravelMode::Drive,
        )
    }

    #[test]
    fn body_omits_modifiers_without_avoids() {
        let body = serde_json::to_value(build_body(&request())).unwrap();

        assert_eq!(body["travelMode"], "DRIVE");
        assert_eq!(body["computeAlternativeRoutes"], true);
        assert_eq!(body["origin"]["location"]["latLng"]["latitude"], 50.85);
        assert!(body.get("routeModifiers").is_none());
    }

    #[test]
    fn body_carries_independent_avoid_booleans() {
        let request = request().with_avoid(vec![AvoidFeature::Tolls, AvoidFeature::Ferries]);
        let body = serde_json::to_value(build_body(&request)).unwrap();

        assert_eq!(body["routeModifiers"]["avoidTolls"], true);
        assert_eq!(body["routeModifiers"]["avoidHighways"], false);
        assert_eq!(body["routeModifiers"]["avoidFerries"], true);
    }

    #[test]
    fn parses_suffixed_seconds() {
        assert_eq!(parse_seconds("165s"), Some(165));
        assert_eq!(parse_seconds("165.6s"), Some(166));
        assert_eq!(parse_seconds("165"), None);
        assert_eq!(parse_seconds("-5s"), None);
    }

    #[test]
    fn extracts_structured_error_messages() {
        let body = r#"{"error": {"code": 403, "message": "API key invalid"}}"#;
        assert_eq!(extract_error_message(body.to_string()), "API key invalid");

        assert_eq!(extract_error_message("plain text".to_string()), "plain text");
    }

    #[test]
    fn missing_duration_fails_the_route() {
        let route = ModernRoute {
            duration: None,
            distance_meters: Some(1000),
            polyline: Some(ModernPolyline {
                encoded_polyline: Some("_p~iF~ps|U".to_string()),
            }),
            description: None,
        };

        let err = normalize_route(0, route).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
