use crate::{Error, Result};
use geojson::{GeoJson, Geometry, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// Matches `area_type_ref` in the area table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum AreaType {
    /// Flood alert area
    Faa,
    /// Flood warning area
    Fwa,
}

/// WGS84 point, x is longitude and y is latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AreaQuery {
    Point {
        point: Point,
        area_type: Option<AreaType>,
    },
    BoundingBox {
        bbox: BoundingBox,
        area_type: AreaType,
    },
}

/// Full area row: every base column plus the store-computed `geojson`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Area {
    #[serde(flatten)]
    pub columns: JsonObject,
    pub geojson: String,
}

impl Area {
    pub fn code(&self) -> Option<&str> {
        self.columns.get("code").and_then(Value::as_str)
    }

    pub fn geometry(&self) -> Result<Geometry> {
        match self.geojson.parse::<GeoJson>()? {
            GeoJson::Geometry(geometry) => Ok(geometry),
            _ => Err(Error::MalformedRow(format!(
                "geojson of area {} is not a geometry",
                self.code().unwrap_or_default(),
            ))),
        }
    }
}

impl TryFrom<JsonObject> for Area {
    type Error = Error;

    fn try_from(mut row: JsonObject) -> Result<Area> {
        let geojson = match row.shift_remove("geojson") {
            Some(Value::String(geojson)) => geojson,
            other => Err(Error::MalformedRow(format!(
                "expected geojson string, got {other:?}"
            )))?,
        };
        let area = Area {
            columns: row,
            geojson,
        };
        area.geometry()?;
        Ok(area)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AreaSummary {
    pub code: String,
    pub name: Option<String>,
}

impl TryFrom<JsonObject> for AreaSummary {
    type Error = Error;

    fn try_from(row: JsonObject) -> Result<AreaSummary> {
        Ok(serde_json::from_value(Value::Object(row))?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum AreaResult {
    Area(Area),
    Summary(AreaSummary),
}
