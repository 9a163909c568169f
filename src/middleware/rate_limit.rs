use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::future::{ready, Ready};
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::Arc;

use crate::modules::payments::controllers::payment_response;
use crate::modules::payments::{PaymentError, PaymentErrorKind, PaymentResponse};

/// Global request throttle for the payment API using governor.
/// Throttled requests get a RATE_LIMIT_EXCEEDED `PaymentResponse`.
/// Clones share one quota, so build it once outside the app factory.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    requests_per_minute: u32,
}

impl RateLimiter {
    /// Create a new rate limiter; zero is treated as one request per minute
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(GovernorRateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            limiter,
            requests_per_minute: per_minute.get(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimiterMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
            requests_per_minute: self.requests_per_minute,
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    requests_per_minute: u32,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let limiter = self.limiter.clone();
        let requests_per_minute = self.requests_per_minute;

        Box::pin(async move {
            // Liveness probes and provider webhooks are never throttled
            if req.path() == "/health" || req.path().starts_with("/api/webhooks/") {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            match limiter.check() {
                Ok(_) => svc.call(req).await.map(|res| res.map_into_right_body()),
                Err(_) => {
                    tracing::warn!(path = %req.path(), "Rate limit exceeded");
                    let error = PaymentError::new(
                        PaymentErrorKind::RateLimitExceeded,
                        "RATE_LIMITED",
                        format!(
                            "Rate limit exceeded. Maximum {} requests per minute.",
                            requests_per_minute
                        ),
                    );
                    let http_response = payment_response(&PaymentResponse::failure(error));
                    Ok(req.into_response(http_response).map_into_left_body())
                }
            }
        })
    }
}
