pub mod store;

use crate::conf::Conf;
use crate::Result;
use deadpool_postgres::{Config, Pool, Runtime};
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use tokio_postgres::NoTls;
use tokio_postgres_rustls::MakeRustlsConnect;
use tracing::info;

pub use store::{PgStore, Store};

pub fn pool(conf: &Conf) -> Result<Pool> {
    let mut pg_conf = Config::new();
    pg_conf.url = Some(conf.database_url.clone());

    let pool = if conf.database_ssl {
        pg_conf.create_pool(Some(Runtime::Tokio1), tls()?)?
    } else {
        pg_conf.create_pool(Some(Runtime::Tokio1), NoTls)?
    };

    info!(ssl = conf.database_ssl, "Created database pool");
    Ok(pool)
}

fn tls() -> Result<MakeRustlsConnect> {
    let roots = RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_conf =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(MakeRustlsConnect::new(tls_conf))
}
