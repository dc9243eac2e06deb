use super::query::{Params, XY};
use super::{AreaResult, AreaService};
use crate::log::RequestExtension;
use crate::Error;
use actix_web::get;
use actix_web::web::Data;
use actix_web::web::Json;
use actix_web::web::Query;
use actix_web::HttpMessage;
use actix_web::HttpRequest;

// GET /area?x=-0.6&y=54.48
#[get("")]
pub async fn get(
    req: HttpRequest,
    args: Query<Params>,
    service: Data<AreaService>,
) -> Result<Json<Vec<AreaResult>>, Error> {
    let query = XY.validate(&args)?;
    let areas = service.find(&query).await?;
    req.extensions_mut()
        .insert(RequestExtension::new(areas.len()));
    Ok(Json(areas))
}
