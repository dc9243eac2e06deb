use super::query::{Params, COORD_BBOX};
use super::{AreaResult, AreaService};
use crate::log::RequestExtension;
use crate::Error;
use actix_web::get;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Query;
use actix_web::HttpMessage;
use actix_web::HttpRequest;

// GET /area?coord=-0.649,54.467&type=faa
// GET /area?bbox=-0.649,54.467,-0.589,54.494&type=fwa
#[get("")]
pub async fn get(
    req: HttpRequest,
    args: Query<Params>,
    service: Data<AreaService>,
) -> Result<Json<Vec<AreaResult>>, Error> {
    let query = COORD_BBOX.validate(&args)?;
    let areas = service.find(&query).await?;
    req.extensions_mut()
        .insert(RequestExtension::new(areas.len()));
    Ok(Json(areas))
}
