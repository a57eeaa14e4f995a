use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{HeaderName, HeaderValue},
    Error,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    errors::AppError,
    limiter::rate_limiter::{RateDecision, RateLimiterStore},
    utils::get_client_ip::get_client_ip,
};

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");

/// Per-client-IP request limiting backed by a shared [`RateLimiterStore`].
pub struct RateLimit {
    store: RateLimiterStore,
    trust_proxy: bool,
}

impl RateLimit {
    pub fn new(store: RateLimiterStore, trust_proxy: bool) -> Self {
        RateLimit { store, trust_proxy }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            trust_proxy: self.trust_proxy,
        })
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimiterStore,
    trust_proxy: bool,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let client_ip = get_client_ip(req.request(), self.trust_proxy);
        let decision = self.store.check(&client_ip);

        Box::pin(async move {
            match decision {
                RateDecision::Limited { retry_after_secs } => {
                    tracing::warn!(client_ip = %client_ip, retry_after_secs, "Rate limit exceeded");
                    let err = AppError::TooManyRequests { retry_after: retry_after_secs };
                    Ok(req.error_response(err).map_into_right_body())
                }
                RateDecision::Allowed { limit, remaining } => {
                    let mut res = service.call(req).await?.map_into_left_body();
                    let headers = res.headers_mut();
                    headers.insert(RATE_LIMIT_LIMIT, HeaderValue::from(limit));
                    headers.insert(RATE_LIMIT_REMAINING, HeaderValue::from(remaining));
                    Ok(res)
                }
            }
        })
    }
}
