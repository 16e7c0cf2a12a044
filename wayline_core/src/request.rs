use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Drive,
    Walk,
    Bicycle,
    Transit,
}

impl Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TravelMode::Drive => "driving",
                TravelMode::Walk => "walking",
                TravelMode::Bicycle => "bicycling",
                TravelMode::Transit => "transit",
            }
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvoidFeature {
    Tolls,
    Highways,
    Ferries,
}

impl Display for AvoidFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AvoidFeature::Tolls => "tolls",
                AvoidFeature::Highways => "highways",
                AvoidFeature::Ferries => "ferries",
            }
        )
    }
}

/// Canonical routing request, independent of any provider wire format.
/// Built once per resolution and not mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: LatLng,
    pub destination: LatLng,
    pub mode: TravelMode,
    pub avoid: Vec<AvoidFeature>,
    pub alternatives: bool,
}

impl RouteRequest {
    pub fn new(origin: LatLng, destination: LatLng, mode: TravelMode) -> RouteRequest {
        RouteRequest {
            origin,
            destination,
            mode,
            avoid: Vec::new(),
            alternatives: true,
        }
    }

    /// Avoid-features are a set: a repeated feature is kept once, in first
    /// appearance order, so it cannot render twice on a provider query.
    pub fn with_avoid(mut self, avoid: Vec<AvoidFeature>) -> RouteRequest {
        self.avoid.clear();
        for feature in avoid {
            if !self.avoid.contains(&feature) {
                self.avoid.push(feature);
            }
        }
        self
    }

    pub fn with_alternatives(mut self, alternatives: bool) -> RouteRequest {
        self.alternatives = alternatives;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn travel_modes_render_in_directions_form() {
        assert_eq!(TravelMode::Drive.to_string(), "driving");
        assert_eq!(TravelMode::Bicycle.to_string(), "bicycling");
    }

    #[test]
    fn with_avoid_drops_duplicate_features() {
        let request = RouteRequest::new(
            LatLng::new(50.85, 4.35),
            LatLng::new(51.05, 3.72),
            TravelMode::Drive,
        )
        .with_avoid(vec![
            AvoidFeature::Tolls,
            AvoidFeature::Tolls,
            AvoidFeature::Ferries,
        ]);

        assert_eq!(request.avoid, vec![AvoidFeature::Tolls, AvoidFeature::Ferries]);
    }

    #[test]
    fn new_request_defaults_to_alternatives_and_no_avoids() {
        let request = RouteRequest::new(
            LatLng::new(50.85, 4.35),
            LatLng::new(51.05, 3.72),
            TravelMode::Drive,
        );

        assert!(request.alternatives);
        assert!(request.avoid.is_empty());
    }
}
