use super::model::{Area, AreaQuery, AreaResult, AreaSummary, AreaType};
use crate::db::Store;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, error};

pub static FIND_ALERT_AREAS_BY_POINT: &str = r#"
    SELECT *, st_asgeojson(geom) AS geojson
    FROM xws_area.area ar
    WHERE ar.area_type_ref = 'faa'
        AND st_intersects(st_setsrid(st_makepoint($1, $2), 4326), ar.geom)
"#;

pub static FIND_WARNING_AREAS_BY_POINT: &str = r#"
    SELECT *, st_asgeojson(geom) AS geojson
    FROM xws_area.area ar
    WHERE ar.area_type_ref = 'fwa'
        AND st_intersects(st_setsrid(st_makepoint($1, $2), 4326), ar.geom)
"#;

pub static FIND_ALERT_AREAS_BY_BOX: &str = r#"
    SELECT *, st_asgeojson(geom) AS geojson
    FROM xws_area.area ar
    WHERE ar.area_type_ref = 'faa'
        AND st_intersects(st_setsrid(st_makeenvelope($1, $2, $3, $4), 4326), ar.geom)
"#;

pub static FIND_WARNING_AREAS_BY_BOX: &str = r#"
    SELECT *, st_asgeojson(geom) AS geojson
    FROM xws_area.area ar
    WHERE ar.area_type_ref = 'fwa'
        AND st_intersects(st_setsrid(st_makeenvelope($1, $2, $3, $4), 4326), ar.geom)
"#;

pub static FIND_AREAS_BY_POINT: &str = r#"
    SELECT code, name
    FROM xws_area.area ar
    WHERE st_intersects(st_setsrid(st_makepoint($1, $2), 4326), ar.geom)
"#;

#[derive(Clone)]
pub struct AreaService {
    store: Arc<dyn Store>,
}

impl AreaService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        AreaService { store }
    }

    pub async fn find(&self, query: &AreaQuery) -> Result<Vec<AreaResult>> {
        match query {
            AreaQuery::Point { point, area_type } => {
                let area_type = area_type.as_ref().map(|it| -> &str { it.as_ref() });
                self.find_by_point(point.x, point.y, area_type).await
            }
            AreaQuery::BoundingBox { bbox, area_type } => {
                self.find_by_box(bbox.xmin, bbox.ymin, bbox.xmax, bbox.ymax, area_type.as_ref())
                    .await
            }
        }
    }

    /// Areas intersecting the point at (`x` = longitude, `y` = latitude).
    ///
    /// Without an area type every area matches and only code and name are returned.
    pub async fn find_by_point(
        &self,
        x: f64,
        y: f64,
        area_type: Option<&str>,
    ) -> Result<Vec<AreaResult>> {
        let Some(area_type) = area_type else {
            return self.summaries(FIND_AREAS_BY_POINT, &[x, y]).await;
        };
        let sql = match resolve(area_type)? {
            AreaType::Faa => FIND_ALERT_AREAS_BY_POINT,
            AreaType::Fwa => FIND_WARNING_AREAS_BY_POINT,
        };
        self.areas(sql, &[x, y]).await
    }

    pub async fn find_by_box(
        &self,
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
        area_type: &str,
    ) -> Result<Vec<AreaResult>> {
        let sql = match resolve(area_type)? {
            AreaType::Faa => FIND_ALERT_AREAS_BY_BOX,
            AreaType::Fwa => FIND_WARNING_AREAS_BY_BOX,
        };
        self.areas(sql, &[xmin, ymin, xmax, ymax]).await
    }

    async fn areas(&self, sql: &str, params: &[f64]) -> Result<Vec<AreaResult>> {
        let rows = self.store.query(sql, params).await?;
        debug!(rows = rows.len(), ?params, "Found areas");
        rows.into_iter()
            .map(|row| Area::try_from(row).map(AreaResult::Area))
            .collect()
    }

    async fn summaries(&self, sql: &str, params: &[f64]) -> Result<Vec<AreaResult>> {
        let rows = self.store.query(sql, params).await?;
        debug!(rows = rows.len(), ?params, "Found area summaries");
        rows.into_iter()
            .map(|row| AreaSummary::try_from(row).map(AreaResult::Summary))
            .collect()
    }
}

fn resolve(area_type: &str) -> Result<AreaType> {
    area_type.parse().map_err(|_| {
        error!(area_type, "Area type reached the area service without validation");
        Error::UnknownAreaType(area_type.into())
    })
}

#[cfg(test)]
mod test {
    use super::{
        AreaService, FIND_ALERT_AREAS_BY_BOX, FIND_ALERT_AREAS_BY_POINT, FIND_AREAS_BY_POINT,
        FIND_WARNING_AREAS_BY_BOX, FIND_WARNING_AREAS_BY_POINT,
    };
    use crate::area::model::{AreaQuery, AreaResult, AreaType, BoundingBox, Point};
    use crate::test::{mock_area, mock_geometry, mock_summary, MockStore};
    use crate::{Error, Result};
    use actix_web::test;
    use serde_json::json;

    #[test]
    async fn find_alert_areas_by_point() -> Result<()> {
        let store = MockStore::new(vec![mock_area("122WAC953", AreaType::Faa)]);
        let service = AreaService::new(store.clone());
        let res = service.find_by_point(-0.64, 54.46, Some("faa")).await?;
        assert_eq!(1, res.len());
        let calls = store.calls();
        assert_eq!(1, calls.len());
        assert_eq!(FIND_ALERT_AREAS_BY_POINT, calls[0].sql);
        assert_eq!(vec![-0.64, 54.46], calls[0].params);
        Ok(())
    }

    #[test]
    async fn find_warning_areas_by_point() -> Result<()> {
        let store = MockStore::new(vec![]);
        let service = AreaService::new(store.clone());
        service.find_by_point(-0.64, 54.46, Some("fwa")).await?;
        let calls = store.calls();
        assert_eq!(1, calls.len());
        assert_eq!(FIND_WARNING_AREAS_BY_POINT, calls[0].sql);
        Ok(())
    }

    #[test]
    async fn find_by_box_dispatches_on_type() -> Result<()> {
        let store = MockStore::new(vec![]);
        let service = AreaService::new(store.clone());
        service
            .find_by_box(-0.649, 54.467, -0.589, 54.494, "faa")
            .await?;
        service
            .find_by_box(-0.649, 54.467, -0.589, 54.494, "fwa")
            .await?;
        let calls = store.calls();
        assert_eq!(2, calls.len());
        assert_eq!(FIND_ALERT_AREAS_BY_BOX, calls[0].sql);
        assert_eq!(FIND_WARNING_AREAS_BY_BOX, calls[1].sql);
        assert_eq!(vec![-0.649, 54.467, -0.589, 54.494], calls[1].params);
        Ok(())
    }

    #[test]
    async fn find_by_point_without_type_returns_summaries() -> Result<()> {
        let store = MockStore::new(vec![
            mock_summary("122WAC953", "Esk"),
            mock_summary("122FWC952", "Whitby"),
        ]);
        let service = AreaService::new(store.clone());
        let res = service.find_by_point(-0.6, 54.48, None).await?;
        assert_eq!(2, res.len());
        assert!(res.iter().all(|it| matches!(it, AreaResult::Summary(_))));
        assert_eq!(FIND_AREAS_BY_POINT, store.calls()[0].sql);
        Ok(())
    }

    #[test]
    async fn unknown_area_type() {
        let store = MockStore::new(vec![mock_area("122WAC953", AreaType::Faa)]);
        let service = AreaService::new(store.clone());
        let res = service.find_by_point(-0.64, 54.46, Some("xyz")).await;
        assert!(matches!(res, Err(Error::UnknownAreaType(it)) if it == "xyz"));
        let res = service.find_by_box(0.0, 0.0, 1.0, 1.0, "FAA").await;
        assert!(matches!(res, Err(Error::UnknownAreaType(_))));
        assert!(store.calls().is_empty());
    }

    #[test]
    async fn find_query_keeps_coordinate_order() -> Result<()> {
        let store = MockStore::new(vec![]);
        let service = AreaService::new(store.clone());
        let query = AreaQuery::Point {
            point: Point { x: -0.64, y: 54.46 },
            area_type: Some(AreaType::Fwa),
        };
        service.find(&query).await?;
        let query = AreaQuery::BoundingBox {
            bbox: BoundingBox {
                xmin: -0.649,
                ymin: 54.467,
                xmax: -0.589,
                ymax: 54.494,
            },
            area_type: AreaType::Faa,
        };
        service.find(&query).await?;
        let calls = store.calls();
        assert_eq!(FIND_WARNING_AREAS_BY_POINT, calls[0].sql);
        assert_eq!(vec![-0.64, 54.46], calls[0].params);
        assert_eq!(FIND_ALERT_AREAS_BY_BOX, calls[1].sql);
        assert_eq!(vec![-0.649, 54.467, -0.589, 54.494], calls[1].params);
        Ok(())
    }

    #[test]
    async fn geojson_survives_shaping() -> Result<()> {
        let store = MockStore::new(vec![mock_area("122WAC953", AreaType::Faa)]);
        let service = AreaService::new(store);
        let res = service.find_by_point(-0.64, 54.46, Some("faa")).await?;
        let AreaResult::Area(area) = &res[0] else {
            panic!("expected a full area");
        };
        assert_eq!(Some(&json!("0103000020E6100000")), area.columns.get("geom"));
        assert_eq!(mock_geometry(), area.geometry()?);
        Ok(())
    }

    #[test]
    async fn malformed_row_fails_whole_request() {
        let mut broken = mock_area("122FWC952", AreaType::Faa);
        broken.shift_remove("geojson");
        let store = MockStore::new(vec![mock_area("122WAC953", AreaType::Faa), broken]);
        let service = AreaService::new(store);
        let res = service.find_by_point(-0.64, 54.46, Some("faa")).await;
        assert!(matches!(res, Err(Error::MalformedRow(_))));
    }

    #[test]
    async fn store_error_propagates() {
        let service = AreaService::new(MockStore::failing());
        let res = service.find_by_point(-0.64, 54.46, Some("faa")).await;
        assert!(matches!(res, Err(err) if err.is_store()));
    }

    #[test]
    async fn predicates_use_st_intersects() {
        for sql in [
            FIND_ALERT_AREAS_BY_POINT,
            FIND_WARNING_AREAS_BY_POINT,
            FIND_ALERT_AREAS_BY_BOX,
            FIND_WARNING_AREAS_BY_BOX,
            FIND_AREAS_BY_POINT,
        ] {
            assert!(sql.contains("st_intersects("));
            assert!(!sql.contains("st_within") && !sql.contains("st_contains"));
            assert!(sql.contains(", 4326)"));
        }
    }
}
