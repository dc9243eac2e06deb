use crate::area::query::Contract;
use crate::area::{self, AreaService};
use crate::conf::Conf;
use crate::db::{self, PgStore};
use crate::{error, log, Result};
use actix_web::middleware::from_fn;
use actix_web::web::{scope, QueryConfig, ServiceConfig};
use actix_web::{
    middleware::{Compress, NormalizePath},
    web::Data,
    App, HttpServer,
};
use std::sync::Arc;
use tracing::info;

pub async fn run(conf: Conf) -> Result<()> {
    // All the worker threads are sharing a single connection pool
    let store = Arc::new(PgStore::new(db::pool(&conf)?));
    let service = Data::new(AreaService::new(store.clone()));
    let contract = conf.area_contract;

    info!(host = %conf.host, port = conf.port, %contract, "Starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(log::handle_request))
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(service.clone())
            .app_data(QueryConfig::default().error_handler(error::query_error_handler))
            .configure(|cfg| routes(cfg, contract))
    })
    .bind((conf.host.as_str(), conf.port))?
    .run()
    .await?;

    info!("Server stopped, closing database pool");
    store.close();

    Ok(())
}

pub fn routes(cfg: &mut ServiceConfig, contract: Contract) {
    cfg.service(scope("v1").service(scope("areas").service(area::v1::get)))
        .service(scope("v2").service(scope("area").service(area::v2::get)))
        .service(scope("v3").service(scope("area").service(area::v3::get)))
        .service(scope("areas").service(area::v1::get));

    match contract {
        Contract::Coord => cfg.service(scope("area").service(area::v2::get)),
        Contract::Xy => cfg.service(scope("area").service(area::v3::get)),
    };
}
