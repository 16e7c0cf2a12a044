use serde::{Deserialize, Serialize};

use crate::latlng::LatLng;

/// One candidate path between origin and destination, normalized from
/// whichever provider produced it.
///
/// Ordering contract: `index` is the 0-based rank assigned by the winning
/// provider, and index 0 is the primary (fastest) alternative. The rank is
/// provider-asserted, not re-verified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlternative {
    pub geometry: Vec<LatLng>,
    pub distance_meters: u32,
    pub distance_text: String,
    pub duration_seconds: u32,
    pub duration_text: String,
    pub traffic_duration_text: Option<String>,
    pub summary: String,
    pub index: usize,
}
