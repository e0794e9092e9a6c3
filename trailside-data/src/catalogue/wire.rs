//! On-disk catalogue document.
//!
//! ```json
//! {
//!   "techRatings": [{"code": "1", "name": "Easy", "level": 1}],
//!   "trails": [{
//!     "id": 1, "name": "Mount Falcon",
//!     "location": {"lat": 39.63, "lon": -105.23},
//!     "techRatingLow": "1", "techRatingHigh": "3"
//!   }],
//!   "paths": [{"id": 10, "trailId": 1, "geojson": {"type": "LineString", "coordinates": []}}]
//! }
//! ```

use serde::Deserialize;
use serde_json::Value;
use trailside_core::TrailId;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CatalogueDocument {
    pub tech_ratings: Vec<WireTechRating>,
    pub trails: Vec<WireTrail>,
    #[serde(default)]
    pub paths: Vec<WirePath>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireTechRating {
    pub code: String,
    pub name: String,
    pub level: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WireTrail {
    pub id: TrailId,
    pub name: String,
    pub location: WireLocation,
    pub tech_rating_low: String,
    pub tech_rating_high: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(super) struct WireLocation {
    pub lat: f64,
    pub lon: f64,
}

/// A path payload may be inline GeoJSON or an already serialized string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct WirePath {
    pub id: u64,
    pub trail_id: TrailId,
    pub geojson: Value,
}

impl WirePath {
    pub(super) fn payload(self) -> String {
        match self.geojson {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }
}
