use crate::core::geo::LatLng;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// GeoJSON position: `[lng, lat]` with an optional altitude/depth
pub type Position = Vec<f64>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<GeoJsonGeometry>,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Root GeoJSON object.
///
/// Collection members stay as raw JSON until iterated so a single malformed
/// feature can be skipped without rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJson {
    Feature(GeoJsonFeature),
    FeatureCollection { features: Vec<serde_json::Value> },
}

impl GeoJson {
    /// Parses a GeoJSON document
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MapError::Parse(format!("invalid GeoJSON: {}", e)))
    }

    /// Number of features, well-formed or not
    pub fn len(&self) -> usize {
        match self {
            GeoJson::Feature(_) => 1,
            GeoJson::FeatureCollection { features } => features.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Typed features in document order; malformed members yield an error
    pub fn into_features(self) -> Vec<Result<GeoJsonFeature>> {
        match self {
            GeoJson::Feature(feature) => vec![Ok(feature)],
            GeoJson::FeatureCollection { features } => features
                .into_iter()
                .enumerate()
                .map(|(index, value)| {
                    serde_json::from_value(value).map_err(|e| {
                        MapError::InvalidFeature(format!("feature #{}: {}", index, e))
                    })
                })
                .collect(),
        }
    }
}

impl GeoJsonFeature {
    /// Looks up a property value
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.as_ref()?.get(key)
    }

    /// String property; `null` and non-strings yield `None`
    pub fn str_property(&self, key: &str) -> Option<&str> {
        self.property(key)?.as_str()
    }

    /// Numeric property; `null` and non-numbers yield `None`
    pub fn f64_property(&self, key: &str) -> Option<f64> {
        self.property(key)?.as_f64()
    }

    pub fn i64_property(&self, key: &str) -> Option<i64> {
        let value = self.property(key)?;
        value.as_i64().or_else(|| value.as_f64().map(|v| v as i64))
    }

    /// Feature id rendered as a string
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl GeoJsonGeometry {
    /// Geometry type name as written in GeoJSON
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point { .. } => "Point",
            GeoJsonGeometry::LineString { .. } => "LineString",
            GeoJsonGeometry::Polygon { .. } => "Polygon",
            GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
            GeoJsonGeometry::MultiLineString { .. } => "MultiLineString",
            GeoJsonGeometry::MultiPolygon { .. } => "MultiPolygon",
            GeoJsonGeometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Converts one position, rejecting short positions
    pub fn position_to_lat_lng(position: &[f64]) -> Result<LatLng> {
        LatLng::from_position(position).ok_or_else(|| {
            MapError::InvalidFeature(format!(
                "position needs at least 2 ordinates, got {}",
                position.len()
            ))
        })
    }

    fn line_to_lat_lngs(line: &[Position]) -> Result<Vec<LatLng>> {
        line.iter().map(|p| Self::position_to_lat_lng(p)).collect()
    }

    /// Line parts of a LineString or MultiLineString
    pub fn to_lines(&self) -> Result<Vec<Vec<LatLng>>> {
        match self {
            GeoJsonGeometry::LineString { coordinates } => Ok(vec![Self::line_to_lat_lngs(coordinates)?]),
            GeoJsonGeometry::MultiLineString { coordinates } => coordinates
                .iter()
                .map(|line| Self::line_to_lat_lngs(line))
                .collect(),
            other => Err(MapError::InvalidFeature(format!(
                "expected LineString or MultiLineString, got {}",
                other.type_name()
            ))),
        }
    }

}
