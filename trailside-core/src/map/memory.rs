//! In-memory map surface that records sources and layers and can evaluate
//! their styling without a renderer.

use std::collections::HashMap;

use geo::{BoundingRect, Coord, Rect};
use geojson::{Feature, FeatureCollection};

use super::{Color, LineLayer, MapSurface, MapSurfaceError};

/// One feature as a line layer would draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    /// Layer drawing the feature.
    pub layer_id: String,
    /// Index of the feature within its source.
    pub feature_index: usize,
    /// Resolved line colour.
    pub color: Color,
    /// Line width in pixels.
    pub width: f64,
}

/// Map surface storing sources and layers in memory.
///
/// # Examples
/// ```
/// use geojson::FeatureCollection;
/// use trailside_core::map::{MapSurface, MemoryMapSurface};
///
/// let mut surface = MemoryMapSurface::new();
/// let empty = FeatureCollection { bbox: None, features: vec![], foreign_members: None };
/// surface.add_source("trails", empty.clone()).expect("fresh id");
/// assert!(surface.add_source("trails", empty).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryMapSurface {
    sources: HashMap<String, FeatureCollection>,
    layers: Vec<LineLayer>,
}

impl MemoryMapSurface {
    /// Create an empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Data of source `id`.
    pub fn source(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id)
    }

    /// Layer `id`.
    pub fn layer(&self, id: &str) -> Option<&LineLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Layers in drawing order.
    pub fn layers(&self) -> &[LineLayer] {
        &self.layers
    }

    /// Every feature drawn by every layer, with its resolved style.
    pub fn rendered_lines(&self) -> Vec<RenderedLine> {
        self.layers
            .iter()
            .flat_map(|layer| {
                self.sources
                    .get(&layer.source)
                    .into_iter()
                    .flat_map(|data| data.features.iter().enumerate())
                    .filter(|(_, feature)| drawn_by(layer, feature))
                    .map(|(feature_index, feature)| RenderedLine {
                        layer_id: layer.id.clone(),
                        feature_index,
                        color: layer.line_color.evaluate(feature.properties.as_ref()),
                        width: layer.line_width,
                    })
            })
            .collect()
    }

    /// Bounding rectangle of every geometry in source `id`.
    ///
    /// Returns `None` for an absent or empty source.
    pub fn source_bounds(&self, id: &str) -> Option<Rect<f64>> {
        self.sources
            .get(id)?
            .features
            .iter()
            .filter_map(|feature| feature.geometry.clone())
            .filter_map(|geometry| geo::Geometry::<f64>::try_from(geometry).ok())
            .filter_map(|geometry| geometry.bounding_rect())
            .reduce(union)
    }
}

fn drawn_by(layer: &LineLayer, feature: &Feature) -> bool {
    feature
        .geometry
        .as_ref()
        .is_some_and(|geometry| layer.filter.accepts(geometry))
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        Coord {
            x: a.min().x.min(b.min().x),
            y: a.min().y.min(b.min().y),
        },
        Coord {
            x: a.max().x.max(b.max().x),
            y: a.max().y.max(b.max().y),
        },
    )
}

impl MapSurface for MemoryMapSurface {
    fn add_source(&mut self, id: &str, data: FeatureCollection) -> Result<(), MapSurfaceError> {
        if self.sources.contains_key(id) {
            return Err(MapSurfaceError::DuplicateSource(id.to_owned()));
        }
        self.sources.insert(id.to_owned(), data);
        Ok(())
    }

    fn add_layer(&mut self, layer: LineLayer) -> Result<(), MapSurfaceError> {
        if self.layer(&layer.id).is_some() {
            return Err(MapSurfaceError::DuplicateLayer(layer.id));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(MapSurfaceError::MissingSource(layer.source));
        }
        self.layers.push(layer);
        Ok(())
    }

    fn update_source(
        &mut self,
        id: &str,
        data: FeatureCollection,
    ) -> Result<(), MapSurfaceError> {
        let slot = self
            .sources
            .get_mut(id)
            .ok_or_else(|| MapSurfaceError::MissingSource(id.to_owned()))?;
        *slot = data;
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), MapSurfaceError> {
        let index = self
            .layers
            .iter()
            .position(|layer| layer.id == id)
            .ok_or_else(|| MapSurfaceError::MissingLayer(id.to_owned()))?;
        self.layers.remove(index);
        Ok(())
    }

    fn remove_source(&mut self, id: &str) -> Result<(), MapSurfaceError> {
        if !self.sources.contains_key(id) {
            return Err(MapSurfaceError::MissingSource(id.to_owned()));
        }
        if let Some(layer) = self.layers.iter().find(|layer| layer.source == id) {
            return Err(MapSurfaceError::SourceInUse {
                source_id: id.to_owned(),
                layer_id: layer.id.clone(),
            });
        }
        self.sources.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{ColorMatch, GeometryFilter};
    use geojson::{Geometry, Value};
    use rstest::{fixture, rstest};

    fn feature(value: Value, level: Option<&str>) -> Feature {
        let mut feature = Feature::from(Geometry::new(value));
        if let Some(level) = level {
            feature.set_property("level", level);
        }
        feature
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn layer(id: &str, source: &str) -> LineLayer {
        LineLayer {
            id: id.to_owned(),
            source: source.to_owned(),
            filter: GeometryFilter::LineString,
            line_color: ColorMatch::new("level", Color::DARK_GRAY).case("1", Color::BLUE),
            line_width: 2.0,
        }
    }

    #[fixture]
    fn surface() -> MemoryMapSurface {
        let mut surface = MemoryMapSurface::new();
        surface
            .add_source("trails", collection(Vec::new()))
            .expect("fresh source");
        surface
    }

    #[rstest]
    fn layer_requires_existing_source(mut surface: MemoryMapSurface) {
        let err = surface
            .add_layer(layer("paths", "elsewhere"))
            .expect_err("source is absent");
        assert_eq!(err, MapSurfaceError::MissingSource("elsewhere".to_owned()));
    }

    #[rstest]
    fn duplicate_layer_is_rejected(mut surface: MemoryMapSurface) {
        surface
            .add_layer(layer("paths", "trails"))
            .expect("first layer");
        let err = surface
            .add_layer(layer("paths", "trails"))
            .expect_err("duplicate layer");
        assert_eq!(err, MapSurfaceError::DuplicateLayer("paths".to_owned()));
    }

    #[rstest]
    fn source_in_use_cannot_be_removed(mut surface: MemoryMapSurface) {
        surface
            .add_layer(layer("paths", "trails"))
            .expect("layer added");

        let err = surface
            .remove_source("trails")
            .expect_err("layer still draws from source");

        assert!(matches!(err, MapSurfaceError::SourceInUse { .. }));
        surface.remove_layer("paths").expect("layer present");
        surface.remove_source("trails").expect("source now free");
        assert!(surface.source("trails").is_none());
    }

    #[rstest]
    fn update_replaces_source_contents(mut surface: MemoryMapSurface) {
        let lines = collection(vec![feature(
            Value::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]]),
            None,
        )]);
        surface.update_source("trails", lines).expect("source present");
        surface
            .update_source("trails", collection(Vec::new()))
            .expect("source present");

        assert_eq!(surface.source("trails").map(|c| c.features.len()), Some(0));
    }

    #[rstest]
    fn rendered_lines_apply_filter_and_colour(mut surface: MemoryMapSurface) {
        surface
            .update_source(
                "trails",
                collection(vec![
                    feature(
                        Value::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]]),
                        Some("1"),
                    ),
                    feature(Value::Point(vec![0.0, 0.0]), Some("1")),
                    feature(
                        Value::LineString(vec![vec![2.0, 2.0], vec![3.0, 3.0]]),
                        None,
                    ),
                ]),
            )
            .expect("source present");
        surface
            .add_layer(layer("paths", "trails"))
            .expect("layer added");

        let rendered = surface.rendered_lines();

        let drawn: Vec<(usize, Color)> = rendered
            .iter()
            .map(|line| (line.feature_index, line.color))
            .collect();
        assert_eq!(drawn, vec![(0, Color::BLUE), (2, Color::DARK_GRAY)]);
    }

    #[rstest]
    fn bounds_cover_every_geometry(mut surface: MemoryMapSurface) {
        surface
            .update_source(
                "trails",
                collection(vec![
                    feature(
                        Value::LineString(vec![vec![-105.0, 39.0], vec![-104.5, 39.5]]),
                        None,
                    ),
                    feature(Value::Point(vec![-106.0, 40.0]), None),
                ]),
            )
            .expect("source present");

        let bounds = surface.source_bounds("trails").expect("non-empty source");

        assert_eq!(bounds.min(), Coord { x: -106.0, y: 39.0 });
        assert_eq!(bounds.max(), Coord { x: -104.5, y: 40.0 });
    }

    #[rstest]
    fn empty_source_has_no_bounds(surface: MemoryMapSurface) {
        assert!(surface.source_bounds("trails").is_none());
        assert!(surface.source_bounds("missing").is_none());
    }
}
