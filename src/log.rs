use crate::conf::Conf;
use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    Error, HttpMessage,
};
use time::OffsetDateTime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SLOW_REQUEST_SEC: f64 = 5.0;

pub fn init(conf: &Conf) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(conf.log_level.into()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if conf.is_dev() {
        builder.init();
    } else {
        builder.json().with_current_span(false).init();
    }
}

/// Handlers attach this so the request log can report how many areas were returned.
pub struct RequestExtension {
    pub entities: i64,
}

impl RequestExtension {
    pub fn new(entities: usize) -> Self {
        RequestExtension {
            entities: entities as i64,
        }
    }
}

pub async fn handle_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let req_query_string = req.query_string().to_string();
    let req_method = req.method().as_str().to_string();
    let req_path = req.path().to_string();
    let req_version = format!("{:?}", req.version());
    let req_time = OffsetDateTime::now_utc();
    let req_ip = req
        .connection_info()
        .peer_addr()
        .unwrap_or_default()
        .to_string();
    let req_real_ip = req
        .connection_info()
        .realip_remote_addr()
        .unwrap_or_default()
        .to_string();

    let res = next.call(req).await?;

    let res_status = res.status().as_u16();
    let res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64();
    let entities = res
        .request()
        .extensions()
        .get::<RequestExtension>()
        .map(|it| it.entities);

    if res_time_sec > SLOW_REQUEST_SEC {
        warn!(
            req_query_string,
            req_method,
            req_path,
            req_version,
            req_ip,
            req_real_ip,
            res_status,
            res_time_sec,
            entities,
            "Slow request",
        );
    } else {
        info!(
            req_query_string,
            req_method,
            req_path,
            req_version,
            req_ip,
            req_real_ip,
            res_status,
            res_time_sec,
            entities,
        );
    }

    Ok(res)
}

#[cfg(test)]
mod test {
    use super::RequestExtension;
    use actix_web::http::StatusCode;
    use actix_web::middleware::from_fn;
    use actix_web::test::TestRequest;
    use actix_web::{get, test, App, HttpMessage, HttpRequest, HttpResponse};

    #[get("/items")]
    async fn items(req: HttpRequest) -> HttpResponse {
        req.extensions_mut().insert(RequestExtension::new(3));
        HttpResponse::Ok().finish()
    }

    #[test]
    async fn passes_response_through() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(super::handle_request))
                .service(items),
        )
        .await;
        let req = TestRequest::get().uri("/items?x=1").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(StatusCode::OK, res.status());
        let entities = res
            .request()
            .extensions()
            .get::<RequestExtension>()
            .map(|it| it.entities);
        assert_eq!(Some(3), entities);
    }
}
