use actix_web::{
    error::QueryPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tracing::error;

#[derive(Debug)]
pub enum Error {
    Config(String),
    Validation(String),
    UnknownAreaType(String),
    IO(std::io::Error),
    Postgres(tokio_postgres::Error),
    DeadpoolPool(deadpool_postgres::PoolError),
    DeadpoolBuild(deadpool_postgres::CreatePoolError),
    Tls(rustls::Error),
    SerdeJson(serde_json::Error),
    GeoJson(geojson::Error),
    MalformedRow(String),
}

impl Error {
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            Error::Postgres(_)
                | Error::DeadpoolPool(_)
                | Error::SerdeJson(_)
                | Error::GeoJson(_)
                | Error::MalformedRow(_)
        )
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(err) => write!(f, "The server config is invalid. {err}"),
            Error::Validation(err) => write!(f, "{err}"),
            Error::UnknownAreaType(err) => write!(f, "Unknown area type: {err}"),
            Error::IO(err) => err.fmt(f),
            Error::Postgres(err) => err.fmt(f),
            Error::DeadpoolPool(err) => err.fmt(f),
            Error::DeadpoolBuild(err) => err.fmt(f),
            Error::Tls(err) => err.fmt(f),
            Error::SerdeJson(err) => err.fmt(f),
            Error::GeoJson(err) => err.fmt(f),
            Error::MalformedRow(err) => write!(f, "Malformed row: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::IO(error)
    }
}

impl From<tokio_postgres::Error> for Error {
    fn from(error: tokio_postgres::Error) -> Self {
        Error::Postgres(error)
    }
}

impl From<deadpool_postgres::PoolError> for Error {
    fn from(error: deadpool_postgres::PoolError) -> Self {
        Error::DeadpoolPool(error)
    }
}

impl From<deadpool_postgres::CreatePoolError> for Error {
    fn from(error: deadpool_postgres::CreatePoolError) -> Self {
        Error::DeadpoolBuild(error)
    }
}

impl From<rustls::Error> for Error {
    fn from(error: rustls::Error) -> Self {
        Error::Tls(error)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::SerdeJson(error)
    }
}

impl From<geojson::Error> for Error {
    fn from(error: geojson::Error) -> Self {
        Error::GeoJson(error)
    }
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::Validation(format!("Invalid arguments: {err}")).into()
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiError {
    pub http_code: u16,
    pub message: String,
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Error::Validation(_) | Error::UnknownAreaType(_) => self.to_string(),
            _ if self.is_store() => {
                error!(error = %self, "Store query failed");
                "Database query failed".into()
            }
            _ => {
                error!(error = %self, "Request failed");
                "Internal server error".into()
            }
        };
        HttpResponse::build(self.status_code()).json(ApiError {
            http_code: self.status_code().as_u16(),
            message,
        })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
