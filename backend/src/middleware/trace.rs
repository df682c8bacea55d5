//! Actix middleware giving every request a [`TraceId`].
//!
//! The wrapped service runs inside [`TraceId::scope`] and a `request` span.
//! Errors built by handlers therefore carry the id, and the `trace-id` header
//! on the response repeats it.

use std::rc::Rc;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use fanclub::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceService {
            inner: Rc::new(service),
        }))
    }
}

pub struct TraceService<S> {
    inner: Rc<S>,
}

fn stamp<B>(response: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => debug!(%error, "trace id is not a valid header value"),
    }
}

impl<S, B> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let inner = Rc::clone(&self.inner);

        Box::pin(
            TraceId::scope(trace_id, async move {
                let mut response = inner.call(req).await?;
                stamp(&mut response, trace_id);
                let status = response.status();
                if status.is_server_error() {
                    warn!(status = status.as_u16(), "request failed");
                } else {
                    info!(status = status.as_u16(), "request completed");
                }
                Ok(response)
            })
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};
    use serde_json::Value;

    use crate::domain::Error as DomainError;
    use crate::inbound::http::ApiResult;

    fn header(response: &ServiceResponse) -> String {
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("trace id header")
            .to_owned()
    }

    #[actix_web::test]
    async fn handlers_see_the_id_in_the_header() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                let id = TraceId::current().map(|id| id.to_string());
                HttpResponse::Ok().body(id.unwrap_or_default())
            }),
        ))
        .await;

        let response = test::call_service(&app, test::TestRequest::get().to_request()).await;
        let id = header(&response);

        assert!(id.parse::<TraceId>().is_ok());
        assert_eq!(test::read_body(response).await, id.as_bytes());
    }

    #[actix_web::test]
    async fn error_bodies_repeat_the_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/",
            web::get().to(|| async {
                ApiResult::<HttpResponse>::Err(DomainError::forbidden("terms not accepted"))
            }),
        ))
        .await;

        let response = test::call_service(&app, test::TestRequest::get().to_request()).await;
        let id = header(&response);
        let body: Value = test::read_body_json(response).await;

        assert_eq!(body["traceId"], id.as_str());
    }

    #[actix_web::test]
    async fn each_request_gets_a_fresh_id() {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(|| async { HttpResponse::NoContent().finish() })),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().to_request()).await;
        let second = test::call_service(&app, test::TestRequest::get().to_request()).await;

        assert_ne!(header(&first), header(&second));
    }
}
