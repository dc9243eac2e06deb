use crate::{Error, Result};
use async_trait::async_trait;
use deadpool_postgres::Pool;
use geojson::JsonObject;
use serde_json::Value;
use tokio_postgres::types::ToSql;

/// Read-only access to the spatial database.
///
/// Rows come back as JSON objects keyed by column name, so callers are free to
/// project whatever columns a query needs.
#[async_trait]
pub trait Store: Send + Sync {
    async fn query(&self, sql: &str, params: &[f64]) -> Result<Vec<JsonObject>>;
}

pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub fn new(pool: Pool) -> Self {
        PgStore { pool }
    }

    pub fn close(&self) {
        self.pool.close();
    }
}

#[async_trait]
impl Store for PgStore {
    async fn query(&self, sql: &str, params: &[f64]) -> Result<Vec<JsonObject>> {
        let sql = wrap(sql);
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|it| it as &(dyn ToSql + Sync)).collect();
        let conn = self.pool.get().await?;
        let stmt = conn.prepare_cached(&sql).await?;
        conn.query(&stmt, &params)
            .await?
            .iter()
            .map(|row| -> Result<JsonObject> {
                match row.try_get::<_, Value>(0)? {
                    Value::Object(obj) => Ok(obj),
                    other => Err(Error::MalformedRow(format!("expected an object, got {other}"))),
                }
            })
            .collect()
    }
}

fn wrap(sql: &str) -> String {
    let sql = sql.trim().trim_end_matches(';');
    format!("select row_to_json(q) from ({sql}) q")
}

#[cfg(test)]
mod test {
    #[test]
    fn wrap() {
        assert_eq!(
            "select row_to_json(q) from (select code from area where x = $1) q",
            super::wrap("\n  select code from area where x = $1;\n"),
        );
    }
}
