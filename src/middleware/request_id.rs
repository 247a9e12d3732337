use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
};
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Correlation id of the current request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

/// Propagates `X-Correlation-ID` from request to response, generating one
/// when the caller sent none. Mount with `middleware::from_fn`.
pub async fn correlation_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let id = req
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

    req.extensions_mut().insert(CorrelationId(id.clone()));

    let mut res = next.call(req).await?;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut()
            .insert(HeaderName::from_static(CORRELATION_HEADER), value);
    }
    Ok(res)
}

pub trait RequestIdExt {
    fn correlation_id(&self) -> Option<String>;
}

impl RequestIdExt for HttpRequest {
    fn correlation_id(&self) -> Option<String> {
        self.extensions().get::<CorrelationId>().map(|c| c.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, middleware::from_fn, test, web};
    use pretty_assertions::assert_eq;

    async fn echo(req: HttpRequest) -> HttpResponse {
        HttpResponse::Ok().body(RequestIdExt::correlation_id(&req).unwrap_or_default())
    }

    #[actix_rt::test]
    async fn incoming_id_is_echoed() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(correlation_id))
                .route("/", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Correlation-ID", "abc-123"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.headers().get(CORRELATION_HEADER).unwrap(), "abc-123");
        let body = test::read_body(res).await;
        assert_eq!(body, "abc-123");
    }

    #[actix_rt::test]
    async fn missing_id_is_generated() {
        let app = test::init_service(
            App::new()
                .wrap(from_fn(correlation_id))
                .route("/", web::get().to(echo)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let header = res.headers().get(CORRELATION_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(header).is_ok());
    }
}
