//! Security middleware for HTTPS enforcement and response hardening headers.
//!
//! Production rejects plain HTTP unless a trusted proxy reports that the
//! client connection was HTTPS. Security headers are added in every
//! environment.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderName, HeaderValue},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use gm_shared::Environment;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use crate::handlers::error::ApiError;

/// Security middleware factory
#[derive(Debug, Clone)]
pub struct SecurityMiddleware {
    enforce_https: bool,
    trusted_proxies: Vec<String>,
}

impl SecurityMiddleware {
    pub fn for_environment(environment: Environment) -> Self {
        let middleware = Self {
            enforce_https: environment.is_production(),
            trusted_proxies: vec!["127.0.0.1".to_string(), "::1".to_string()],
        };
        tracing::info!(
            enforce_https = middleware.enforce_https,
            "Security middleware configured"
        );
        middleware
    }

    /// Adds a proxy whose `X-Forwarded-Proto` header is believed
    pub fn with_trusted_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.trusted_proxies.push(proxy.into());
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityMiddlewareService {
            service: Rc::new(service),
            enforce_https: self.enforce_https,
            trusted_proxies: Rc::new(self.trusted_proxies.clone()),
        }))
    }
}

pub struct SecurityMiddlewareService<S> {
    service: Rc<S>,
    enforce_https: bool,
    trusted_proxies: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for SecurityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
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
        let enforce_https = self.enforce_https;
        let trusted_proxies = Rc::clone(&self.trusted_proxies);

        Box::pin(async move {
            if enforce_https && !is_secure_request(&req, &trusted_proxies) {
                tracing::warn!(
                    event = "insecure_request_blocked",
                    method = %req.method(),
                    path = req.path(),
                    "Insecure request blocked"
                );
                let response = ApiError::Forbidden("HTTPS required".to_string()).error_response();
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut response = service.call(req).await?;
            add_security_headers(response.headers_mut());
            Ok(response.map_into_left_body())
        })
    }
}

fn is_secure_request(req: &ServiceRequest, trusted_proxies: &[String]) -> bool {
    let conn_info = req.connection_info();
    if conn_info.scheme() == "https" {
        return true;
    }

    let forwarded_https = req
        .headers()
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .map(|proto| proto.eq_ignore_ascii_case("https"))
        .unwrap_or(false);

    forwarded_https && is_trusted_proxy(req.peer_addr().map(|addr| addr.ip().to_string()), trusted_proxies)
}

fn is_trusted_proxy(peer_ip: Option<String>, trusted_proxies: &[String]) -> bool {
    peer_ip
        .map(|ip| trusted_proxies.iter().any(|trusted| *trusted == ip))
        .unwrap_or(false)
}

fn add_security_headers(headers: &mut actix_web::http::header::HeaderMap) {
    let values: [(HeaderName, &'static str); 6] = [
        (header::STRICT_TRANSPORT_SECURITY, "max-age=31536000; includeSubDomains"),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "DENY"),
        (header::REFERRER_POLICY, "strict-origin-when-cross-origin"),
        (
            header::CONTENT_SECURITY_POLICY,
            "default-src 'none'; frame-ancestors 'none';",
        ),
        (
            HeaderName::from_static("permissions-policy"),
            "camera=(), geolocation=(), microphone=(), payment=()",
        ),
    ];

    for (name, value) in values {
        headers.insert(name, HeaderValue::from_static(value));
    }
}
