pub mod model;
pub mod query;
pub mod service;
pub mod v1;
pub mod v2;
pub mod v3;

pub use model::AreaResult;
pub use service::AreaService;
