//! Line layer styling: colours, discrete colour lookups and geometry filters.

use std::fmt;

use geojson::{Geometry, JsonObject, JsonValue, Value};
use serde_json::json;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// `#FF00FF`
    pub const MAGENTA: Self = Self::rgb(0xFF, 0x00, 0xFF);
    /// `#0000FF`
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xFF);
    /// `#FF8000`
    pub const ORANGE: Self = Self::rgb(0xFF, 0x80, 0x00);
    /// `#FF0000`
    pub const RED: Self = Self::rgb(0xFF, 0x00, 0x00);
    /// `#000000`
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    /// `#555555`
    pub const DARK_GRAY: Self = Self::rgb(0x55, 0x55, 0x55);

    /// Build a colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lower-case `#rrggbb` form used in style documents.
    ///
    /// # Examples
    /// ```
    /// use trailside_core::map::Color;
    ///
    /// assert_eq!(Color::ORANGE.to_hex(), "#ff8000");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Which feature geometries a layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryFilter {
    /// Every feature with a geometry.
    #[default]
    Any,
    /// Line strings and multi line strings only.
    LineString,
}

impl GeometryFilter {
    /// Whether `geometry` passes the filter.
    pub fn accepts(self, geometry: &Geometry) -> bool {
        match self {
            Self::Any => true,
            Self::LineString => matches!(
                geometry.value,
                Value::LineString(_) | Value::MultiLineString(_)
            ),
        }
    }

    fn to_expression(self) -> Option<JsonValue> {
        match self {
            Self::Any => None,
            Self::LineString => Some(json!([
                "in",
                ["geometry-type"],
                ["literal", ["LineString", "MultiLineString"]]
            ])),
        }
    }
}

/// Discrete colour lookup on a string feature property.
///
/// Cases are checked in insertion order; the first equal value wins. Features
/// lacking the property, or holding an unlisted value, get the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMatch {
    property: String,
    cases: Vec<(String, Color)>,
    fallback: Color,
}

impl ColorMatch {
    /// Start a lookup on `property` with `fallback` for unmatched features.
    pub fn new(property: impl Into<String>, fallback: Color) -> Self {
        Self {
            property: property.into(),
            cases: Vec::new(),
            fallback,
        }
    }

    /// Map `value` to `color`. A value that already has a case keeps it.
    #[must_use]
    pub fn case(mut self, value: impl Into<String>, color: Color) -> Self {
        let value = value.into();
        if self.cases.iter().all(|(existing, _)| *existing != value) {
            self.cases.push((value, color));
        }
        self
    }

    /// Property the lookup reads.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Colour applied when no case matches.
    pub const fn fallback(&self) -> Color {
        self.fallback
    }

    /// Configured cases in lookup order.
    pub fn cases(&self) -> &[(String, Color)] {
        &self.cases
    }

    /// Colour for a feature with `properties`.
    ///
    /// # Examples
    /// ```
    /// use geojson::JsonObject;
    /// use trailside_core::map::{Color, ColorMatch};
    ///
    /// let lookup = ColorMatch::new("level", Color::DARK_GRAY).case("1", Color::BLUE);
    /// let mut properties = JsonObject::new();
    /// properties.insert("level".into(), "1".into());
    ///
    /// assert_eq!(lookup.evaluate(Some(&properties)), Color::BLUE);
    /// assert_eq!(lookup.evaluate(None), Color::DARK_GRAY);
    /// ```
    pub fn evaluate(&self, properties: Option<&JsonObject>) -> Color {
        let Some(value) = properties
            .and_then(|props| props.get(&self.property))
            .and_then(JsonValue::as_str)
        else {
            return self.fallback;
        };
        self.cases
            .iter()
            .find(|(case, _)| case == value)
            .map_or(self.fallback, |(_, color)| *color)
    }

    /// Mapbox-style `match` expression equivalent to [`Self::evaluate`].
    pub fn to_expression(&self) -> JsonValue {
        let mut expression = vec![json!("match"), json!(["get", self.property])];
        for (value, color) in &self.cases {
            expression.push(json!(value));
            expression.push(json!(color.to_hex()));
        }
        expression.push(json!(self.fallback.to_hex()));
        JsonValue::Array(expression)
    }
}

/// A styled line layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayer {
    /// Layer identifier.
    pub id: String,
    /// Source the layer draws from.
    pub source: String,
    /// Geometries drawn.
    pub filter: GeometryFilter,
    /// Line colour per feature.
    pub line_color: ColorMatch,
    /// Line width in pixels.
    pub line_width: f64,
}

impl LineLayer {
    /// Style-document JSON for the layer.
    ///
    /// # Examples
    /// ```
    /// use trailside_core::map::{Color, ColorMatch, GeometryFilter, LineLayer};
    ///
    /// let layer = LineLayer {
    ///     id: "paths".into(),
    ///     source: "trails".into(),
    ///     filter: GeometryFilter::LineString,
    ///     line_color: ColorMatch::new("level", Color::BLACK),
    ///     line_width: 2.0,
    /// };
    /// let style = layer.to_style_json();
    /// assert_eq!(style["type"], "line");
    /// assert_eq!(style["paint"]["line-width"], 2.0);
    /// ```
    pub fn to_style_json(&self) -> JsonValue {
        let mut style = json!({
            "id": self.id,
            "type": "line",
            "source": self.source,
            "paint": {
                "line-color": self.line_color.to_expression(),
                "line-width": self.line_width,
            },
        });
        if let (Some(filter), Some(object)) = (self.filter.to_expression(), style.as_object_mut())
        {
            object.insert("filter".to_owned(), filter);
        }
        style
    }
}
