pub use error::Error;
mod area;
mod conf;
mod db;
mod error;
mod log;
mod server;
use conf::Conf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[actix_web::main]
async fn main() -> Result<()> {
    // A missing .env is fine, the environment may be set by the process manager
    dotenvy::dotenv().ok();

    let conf = Conf::from_env()?;

    log::init(&conf);

    server::run(conf).await
}
