use actix_web::{
    body::{BoxBody, MessageBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage, HttpResponse,
};
use futures_util::{
    future::{ok, Ready},
    FutureExt,
};
use std::{
    future::Future,
    pin::Pin,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use super::jwt::{TokenError, TokenKeys};
use crate::routes::ErrorResponse;

/// Rejects requests without a valid `Authorization: Bearer` token and hands
/// the decoded [`Claims`](super::Claims) to the handler through the request
/// extensions.
pub struct JwtMiddleware {
    keys: Arc<TokenKeys>,
}

impl JwtMiddleware {
    pub fn new(keys: Arc<TokenKeys>) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = JwtMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtMiddlewareService {
            service: Rc::new(service),
            keys: self.keys.clone(),
        })
    }
}

pub struct JwtMiddlewareService<S> {
    service: Rc<S>,
    keys: Arc<TokenKeys>,
}

fn reject(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(message))
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let keys = self.keys.clone();

        async move {
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from);

            let Some(token) = token else {
                return Ok(req.into_response(
                    reject(StatusCode::UNAUTHORIZED, "Access token required").map_into_boxed_body(),
                ));
            };

            match keys.verify_token(&token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(|res| res.map_into_boxed_body())
                }
                Err(TokenError::Expired) => Ok(req.into_response(
                    reject(StatusCode::UNAUTHORIZED, "Token has expired").map_into_boxed_body(),
                )),
                Err(e @ TokenError::Invalid(_)) => {
                    tracing::debug!(error = ?e, "Rejected bearer token");
                    Ok(req.into_response(
                        reject(StatusCode::FORBIDDEN, "Invalid token").map_into_boxed_body(),
                    ))
                }
            }
        }
        .boxed_local()
    }
}
