use crate::area::query::Contract;
use crate::{Error, Result};
use std::str::FromStr;
use strum::{Display, EnumString};
use tracing::level_filters::LevelFilter;
use url::{Host, Url};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Env {
    Local,
    Development,
    Test,
    Production,
}

#[derive(Debug, Clone)]
pub struct Conf {
    pub env: Env,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_ssl: bool,
    pub log_level: LevelFilter,
    pub area_contract: Contract,
}

impl Conf {
    pub fn from_env() -> Result<Conf> {
        Conf::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Conf> {
        let var = |name: &str| var(name).filter(|it| !it.trim().is_empty());

        let env = match var("ENV") {
            Some(env) => parse("ENV", &env)?,
            None => Env::Local,
        };

        let host = var("HOST").ok_or(missing("HOST"))?;
        if Host::parse(&host).is_err() {
            Err(invalid("HOST", &host))?
        }

        let port = match var("PORT") {
            Some(port) => parse("PORT", &port)?,
            None => 3000,
        };

        let database_url = var("DATABASE_URL").ok_or(missing("DATABASE_URL"))?;
        match Url::parse(&database_url) {
            Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => {}
            _ => Err(invalid("DATABASE_URL", &database_url))?,
        }

        let database_ssl = match var("DATABASE_SSL") {
            Some(ssl) => parse("DATABASE_SSL", &ssl)?,
            None => false,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(level) => parse("LOG_LEVEL", &level)?,
            None => LevelFilter::INFO,
        };

        let area_contract = match var("AREA_CONTRACT") {
            Some(contract) => parse("AREA_CONTRACT", &contract)?,
            None => Contract::Xy,
        };

        Ok(Conf {
            env,
            host,
            port,
            database_url,
            database_ssl,
            log_level,
            area_contract,
        })
    }

    pub fn is_dev(&self) -> bool {
        matches!(self.env, Env::Local | Env::Development)
    }
}

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| invalid(name, value))
}

fn missing(name: &str) -> Error {
    Error::Config(format!("\"{name}\" is required"))
}

fn invalid(name: &str, value: &str) -> Error {
    Error::Config(format!("\"{name}\" has invalid value \"{value}\""))
}
