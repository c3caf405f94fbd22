//! CORS middleware configuration for cross-origin requests.
//!
//! Browser clients need credentialed requests so the trusted-device cookie
//! is sent on login. A `*` entry in any list allows everything for that list.

use actix_cors::Cors;
use actix_web::http::header;
use gm_shared::CorsConfig;

const WILDCARD: &str = "*";

/// Creates a CORS middleware instance from configuration.
pub fn create_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        tracing::info!("CORS disabled; cross-origin requests will be rejected");
        return Cors::default();
    }

    let mut cors = Cors::default()
        .expose_headers(vec![
            header::HeaderName::from_static("x-request-id"),
            header::RETRY_AFTER,
        ])
        .max_age(usize::try_from(config.max_age).unwrap_or(3600));

    if is_wildcard(&config.allowed_origins) {
        cors = cors.allow_any_origin();
    } else {
        for origin in config.allowed_origins.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
            tracing::info!(origin, "Adding allowed origin");
            cors = cors.allowed_origin(origin);
        }
    }

    cors = if is_wildcard(&config.allowed_methods) {
        cors.allow_any_method()
    } else {
        cors.allowed_methods(config.allowed_methods.iter().map(String::as_str))
    };

    cors = if is_wildcard(&config.allowed_headers) {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(config.allowed_headers.iter().map(String::as_str))
    };

    if config.allow_credentials {
        cors = cors.supports_credentials();
    }

    cors
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == WILDCARD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};

    fn production_config() -> CorsConfig {
        CorsConfig {
            allowed_origins: vec!["https://app.gurmania.com".to_string()],
            ..CorsConfig::default()
        }
    }

    #[actix_web::test]
    async fn test_configured_origin_is_allowed() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&production_config()))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://app.gurmania.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.gurmania.com"
        );
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_development_allows_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&CorsConfig::development()))
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://localhost:3000"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[::core::prelude::v1::test]
    fn test_wildcard_detection() {
        assert!(is_wildcard(&["GET".to_string(), "*".to_string()]));
        assert!(!is_wildcard(&["GET".to_string()]));
    }
}
