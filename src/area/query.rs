//! Query-string contracts for area lookups.
//!
//! Each contract is a [`Schema`] static describing which parameters carry
//! the point, the bounding box and the area type. Supporting another
//! contract means declaring another schema, not adding branches.

use super::model::{AreaQuery, AreaType, BoundingBox, Point};
use crate::{Error, Result};
use std::collections::HashMap;
use strum::{Display, EnumString};

pub type Params = HashMap<String, String>;

/// Contract served by the unversioned `/area` route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Contract {
    Coord,
    Xy,
}

pub enum PointParams {
    /// Two numeric parameters, named in (x, y) order.
    Pair { x: &'static str, y: &'static str },
    /// One `x,y` parameter.
    Csv(&'static str),
}

pub enum BoxParams {
    /// Four numeric parameters, named in (xmin, ymin, xmax, ymax) order.
    Fields([&'static str; 4]),
    /// One `xmin,ymin,xmax,ymax` parameter.
    Csv(&'static str),
}

pub enum Selection {
    /// Point lookup when the named parameter is present, box lookup otherwise.
    PointIf(&'static str),
    /// Exactly one of point and box must be given.
    Exclusive,
}

pub struct Schema {
    pub area_type: Option<&'static str>,
    /// Parameters that fail validation when present. Anything else undeclared is ignored.
    pub forbidden: &'static [&'static str],
    pub point: PointParams,
    pub bbox: Option<BoxParams>,
    pub selection: Selection,
}

/// `lat`,`lon` or `xmin`,`ymin`,`xmax`,`ymax`, plus `type`.
///
/// Latitude is the y ordinate, so `lon` comes first.
pub static LAT_LON: Schema = Schema {
    area_type: Some("type"),
    forbidden: &[],
    point: PointParams::Pair { x: "lon", y: "lat" },
    bbox: Some(BoxParams::Fields(["xmin", "ymin", "xmax", "ymax"])),
    selection: Selection::PointIf("lat"),
};

/// `coord=x,y` or `bbox=xmin,ymin,xmax,ymax`, plus `type`.
pub static COORD_BBOX: Schema = Schema {
    area_type: Some("type"),
    forbidden: &[],
    point: PointParams::Csv("coord"),
    bbox: Some(BoxParams::Csv("bbox")),
    selection: Selection::Exclusive,
};

/// `x`,`y` with no area type filter, so `type` is refused.
pub static XY: Schema = Schema {
    area_type: None,
    forbidden: &["type"],
    point: PointParams::Pair { x: "x", y: "y" },
    bbox: None,
    selection: Selection::Exclusive,
};

impl Schema {
    pub fn validate(&self, params: &Params) -> Result<AreaQuery> {
        if let Some(name) = self.forbidden.iter().find(|it| get(params, it).is_some()) {
            Err(invalid(format!("Parameter \"{name}\" is not accepted")))?
        }

        let area_type = match self.area_type {
            Some(name) => {
                let code = required(params, name)?;
                let area_type = code.parse::<AreaType>().map_err(|_| {
                    invalid(format!("Parameter \"{name}\" must be one of: faa, fwa"))
                })?;
                Some(area_type)
            }
            None => None,
        };

        let point_given = self.point.names().iter().any(|it| get(params, it).is_some());
        let bbox_given = self.bbox.as_ref().is_some_and(|bbox| {
            bbox.names().iter().any(|it| get(params, it).is_some())
        });

        let is_point = match self.selection {
            Selection::PointIf(name) => get(params, name).is_some(),
            Selection::Exclusive => match (point_given, bbox_given) {
                (true, true) => Err(invalid(format!(
                    "Only one of {} may be given",
                    self.shapes()
                )))?,
                (false, false) => Err(invalid(format!("One of {} is required", self.shapes())))?,
                (point_given, _) => point_given,
            },
        };

        match (is_point, &self.bbox, area_type) {
            (true, _, area_type) => Ok(AreaQuery::Point {
                point: self.point.parse(params)?,
                area_type,
            }),
            (false, Some(bbox), Some(area_type)) => Ok(AreaQuery::BoundingBox {
                bbox: bbox.parse(params)?,
                area_type,
            }),
            (false, Some(_), None) => Err(invalid("Bounding box lookups require an area type")),
            (false, None, _) => Err(invalid(format!("One of {} is required", self.shapes()))),
        }
    }

    fn shapes(&self) -> String {
        let mut shapes = vec![self.point.names().join("+")];
        if let Some(bbox) = &self.bbox {
            shapes.push(bbox.names().join("+"));
        }
        shapes.join(", ")
    }
}

impl PointParams {
    fn names(&self) -> Vec<&'static str> {
        match self {
            PointParams::Pair { x, y } => vec![*x, *y],
            PointParams::Csv(name) => vec![*name],
        }
    }

    fn parse(&self, params: &Params) -> Result<Point> {
        let [x, y] = match self {
            PointParams::Pair { x, y } => [
                number(x, required(params, x)?)?,
                number(y, required(params, y)?)?,
            ],
            PointParams::Csv(name) => numbers(name, required(params, name)?)?,
        };
        Ok(Point { x, y })
    }
}

impl BoxParams {
    fn names(&self) -> Vec<&'static str> {
        match self {
            BoxParams::Fields(names) => names.to_vec(),
            BoxParams::Csv(name) => vec![*name],
        }
    }

    fn parse(&self, params: &Params) -> Result<BoundingBox> {
        let [xmin, ymin, xmax, ymax] = match self {
            BoxParams::Fields(names) => {
                let mut res = [0.0; 4];
                for (value, name) in res.iter_mut().zip(names) {
                    *value = number(name, required(params, name)?)?;
                }
                res
            }
            BoxParams::Csv(name) => numbers(name, required(params, name)?)?,
        };
        Ok(BoundingBox {
            xmin,
            ymin,
            xmax,
            ymax,
        })
    }
}

fn get<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|it| it.trim())
        .filter(|it| !it.is_empty())
}

fn required<'a>(params: &'a Params, name: &str) -> Result<&'a str> {
    get(params, name).ok_or_else(|| invalid(format!("Missing parameter: {name}")))
}

fn number(name: &str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(invalid(format!(
            "Parameter \"{name}\" must be a finite number, got \"{value}\""
        ))),
    }
}

fn numbers<const N: usize>(name: &str, value: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = value.split(',').collect();
    if parts.len() != N {
        Err(invalid(format!(
            "Parameter \"{name}\" must have {N} comma-separated numbers, got {}",
            parts.len()
        )))?
    }
    let mut res = [0.0; N];
    for (number_ref, part) in res.iter_mut().zip(parts) {
        *number_ref = number(name, part)?;
    }
    Ok(res)
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Validation(message.into())
}
