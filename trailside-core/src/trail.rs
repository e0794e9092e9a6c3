//! Trail records returned by the trail service and the queries that fetch
//! them.
//!
//! Records are read-only once fetched. Query values validate their inputs on
//! construction so the service never sees a nonsensical search.

use geo::Coord;
use thiserror::Error;

/// Identifier assigned to a trail by the trail service.
pub type TrailId = u64;

/// Technical difficulty classification of a trail.
///
/// `level` orders ratings from easiest to hardest; `code` is the short string
/// used for styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechRating {
    /// Short difficulty code, e.g. `"1"` or `"3+"`.
    pub code: String,
    /// Human readable name.
    pub name: String,
    /// Ordering key, lowest is easiest.
    pub level: u8,
}

impl TechRating {
    /// Construct a rating.
    ///
    /// # Examples
    /// ```
    /// use trailside_core::TechRating;
    ///
    /// let rating = TechRating::new("2", "Moderate", 2);
    /// assert_eq!(rating.code, "2");
    /// ```
    pub fn new(code: impl Into<String>, name: impl Into<String>, level: u8) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            level,
        }
    }
}

/// Minimal trail metadata returned by a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailBasicInfo {
    /// Trail identifier.
    pub id: TrailId,
    /// Display name.
    pub name: String,
    /// Easiest section rating.
    pub tech_rating_low: TechRating,
    /// Hardest section rating.
    pub tech_rating_high: TechRating,
}

impl TrailBasicInfo {
    /// Difficulty code used for styling: the code of the hardest section.
    ///
    /// # Examples
    /// ```
    /// use trailside_core::{TechRating, TrailBasicInfo};
    ///
    /// let trail = TrailBasicInfo {
    ///     id: 7,
    ///     name: "Switchback Ridge".into(),
    ///     tech_rating_low: TechRating::new("1", "Easy", 1),
    ///     tech_rating_high: TechRating::new("3", "Difficult", 3),
    /// };
    /// assert_eq!(trail.difficulty_code(), "3");
    /// ```
    pub fn difficulty_code(&self) -> &str {
        &self.tech_rating_high.code
    }
}

/// Path geometry of a single trail.
///
/// `geojson` holds the serialized GeoJSON payload exactly as the service
/// delivered it; it is decoded by [`crate::feature::convert`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailPath {
    /// Path record identifier.
    pub id: u64,
    /// Trail the path belongs to.
    pub trail_id: TrailId,
    /// Serialized GeoJSON Feature or Geometry.
    pub geojson: String,
}

/// Errors returned when building search criteria.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriteriaError {
    /// The map centre is not a valid WGS84 coordinate.
    #[error("map centre ({x}, {y}) is not a valid longitude/latitude pair")]
    InvalidCentre {
        /// Longitude.
        x: f64,
        /// Latitude.
        y: f64,
    },
    /// The search radius was zero, negative or not finite.
    #[error("search radius must be a positive number of metres, got {0}")]
    InvalidRadius(f64),
    /// The result limit was zero.
    #[error("result limit must be at least one")]
    ZeroLimit,
}

/// Search radius around the map centre, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceRadius(f64);

impl DistanceRadius {
    /// Validate and wrap a radius in metres.
    pub fn from_metres(metres: f64) -> Result<Self, CriteriaError> {
        if metres.is_finite() && metres > 0.0 {
            Ok(Self(metres))
        } else {
            Err(CriteriaError::InvalidRadius(metres))
        }
    }

    /// Radius in metres.
    pub const fn metres(self) -> f64 {
        self.0
    }
}

/// Maximum number of trails a search may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimit(u32);

impl QueryLimit {
    /// Validate and wrap a result limit.
    pub const fn new(limit: u32) -> Result<Self, CriteriaError> {
        if limit == 0 {
            return Err(CriteriaError::ZeroLimit);
        }
        Ok(Self(limit))
    }

    /// The limit as a count.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Map-based trail search.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use trailside_core::{DistanceRadius, QueryLimit, TrailSearchCriteria};
///
/// # fn main() -> Result<(), trailside_core::CriteriaError> {
/// let criteria = TrailSearchCriteria::new(
///     Coord { x: -104.9903, y: 39.7392 },
///     DistanceRadius::from_metres(100_000.0)?,
///     QueryLimit::new(1000)?,
/// )?
/// .with_name("ridge");
/// assert_eq!(criteria.name.as_deref(), Some("ridge"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSearchCriteria {
    /// Search centre.
    pub map_center: Coord<f64>,
    /// Search radius around the centre.
    pub radius: DistanceRadius,
    /// Optional case-insensitive name filter.
    pub name: Option<String>,
    /// Maximum number of results.
    pub limit: QueryLimit,
}

impl TrailSearchCriteria {
    /// Validate the centre and build criteria without a name filter.
    pub fn new(
        map_center: Coord<f64>,
        radius: DistanceRadius,
        limit: QueryLimit,
    ) -> Result<Self, CriteriaError> {
        let valid = map_center.x.is_finite()
            && map_center.y.is_finite()
            && (-180.0..=180.0).contains(&map_center.x)
            && (-90.0..=90.0).contains(&map_center.y);
        if !valid {
            return Err(CriteriaError::InvalidCentre {
                x: map_center.x,
                y: map_center.y,
            });
        }
        Ok(Self {
            map_center,
            radius,
            name: None,
            limit,
        })
    }

    /// Restrict results to trails whose name contains `name`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Batched path request for a set of trails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrailLoadFilter {
    /// Trails whose paths should be loaded.
    pub trail_ids: Vec<TrailId>,
}

impl TrailLoadFilter {
    /// Build a filter covering every trail in `trails`, in order.
    pub fn for_trails(trails: &[TrailBasicInfo]) -> Self {
        Self {
            trail_ids: trails.iter().map(|trail| trail.id).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn denver() -> Coord<f64> {
        Coord {
            x: -104.9903,
            y: 39.7392,
        }
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn radius_rejects_non_positive_values(#[case] metres: f64) {
        assert!(DistanceRadius::from_metres(metres).is_err());
    }

    #[rstest]
    fn limit_rejects_zero() {
        assert_eq!(QueryLimit::new(0), Err(CriteriaError::ZeroLimit));
    }

    #[rstest]
    #[case(Coord { x: 181.0, y: 0.0 })]
    #[case(Coord { x: 0.0, y: -90.5 })]
    #[case(Coord { x: f64::NAN, y: 0.0 })]
    fn criteria_rejects_invalid_centre(#[case] centre: Coord<f64>) {
        let radius = DistanceRadius::from_metres(10.0).expect("valid radius");
        let limit = QueryLimit::new(1).expect("valid limit");
        let err = TrailSearchCriteria::new(centre, radius, limit).expect_err("invalid centre");
        assert!(matches!(err, CriteriaError::InvalidCentre { .. }));
    }

    #[rstest]
    fn load_filter_preserves_trail_order() {
        let rating = TechRating::new("1", "Easy", 1);
        let trails: Vec<TrailBasicInfo> = [3, 1, 2]
            .into_iter()
            .map(|id| TrailBasicInfo {
                id,
                name: format!("Trail {id}"),
                tech_rating_low: rating.clone(),
                tech_rating_high: rating.clone(),
            })
            .collect();
        let filter = TrailLoadFilter::for_trails(&trails);
        assert_eq!(filter.trail_ids, vec![3, 1, 2]);
    }

    #[rstest]
    fn criteria_starts_without_name_filter() {
        let criteria = TrailSearchCriteria::new(
            denver(),
            DistanceRadius::from_metres(1.0).expect("radius"),
            QueryLimit::new(5).expect("limit"),
        )
        .expect("criteria");
        assert!(criteria.name.is_none());
    }
}
