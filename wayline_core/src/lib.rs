pub mod error;
pub mod latlng;
pub mod polyline;
pub mod request;
pub mod route;
pub mod selection;
pub mod units;

pub use error::RouteError;
pub use latlng::LatLng;
pub use polyline::decode;
pub use request::{AvoidFeature, RouteRequest, TravelMode};
pub use route::RouteAlternative;
pub use selection::AlternativeSet;
