//! Request metadata used for rate limiting and device labels

use actix_web::{http::header, HttpRequest};

const MAX_LABEL_LENGTH: usize = 255;

/// Client IP, preferring proxy headers over the socket address
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded_for) = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(ip) = forwarded_for.split(',').map(str::trim).find(|ip| !ip.is_empty()) {
            return Some(ip.to_string());
        }
    }

    if let Some(real_ip) = req
        .headers()
        .get("X-Real-IP")
        .and_then(|value| value.to_str().ok())
    {
        return Some(real_ip.trim().to_string());
    }

    req.connection_info().peer_addr().map(str::to_string)
}

/// Device label from the User-Agent header, truncated to fit storage
pub fn user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| value.chars().take(MAX_LABEL_LENGTH).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.7"));

        let req = TestRequest::default()
            .insert_header(("X-Real-IP", "10.0.0.2"))
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_user_agent_is_truncated() {
        let long = "x".repeat(400);
        let req = TestRequest::default()
            .insert_header((header::USER_AGENT, long.as_str()))
            .to_http_request();
        assert_eq!(user_agent(&req).map(|ua| ua.len()), Some(MAX_LABEL_LENGTH));

        let req = TestRequest::default().to_http_request();
        assert_eq!(user_agent(&req), None);
    }
}
