use super::query::{Params, LAT_LON};
use super::{AreaResult, AreaService};
use crate::log::RequestExtension;
use crate::Error;
use actix_web::get;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Query;
use actix_web::HttpMessage;
use actix_web::HttpRequest;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Debug)]
pub struct GetResponse {
    pub result: Vec<AreaResult>,
}

// GET /areas?lat=54.46&lon=-0.64&type=faa
// GET /areas?xmin=-0.649&ymin=54.467&xmax=-0.589&ymax=54.494&type=fwa
#[get("")]
pub async fn get(
    req: HttpRequest,
    args: Query<Params>,
    service: Data<AreaService>,
) -> Result<Json<GetResponse>, Error> {
    let query = LAT_LON.validate(&args)?;
    let result = service.find(&query).await?;
    req.extensions_mut()
        .insert(RequestExtension::new(result.len()));
    Ok(Json(GetResponse { result }))
}
