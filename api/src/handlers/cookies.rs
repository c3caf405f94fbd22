//! Trusted-device cookie

use actix_web::cookie::{time::Duration, Cookie};
use actix_web::HttpRequest;

use crate::state::DeviceCookieSettings;

/// Cookie carrying a freshly issued device secret
pub fn trusted_device_cookie(settings: &DeviceCookieSettings, value: String) -> Cookie<'static> {
    Cookie::build(settings.name.clone(), value)
        .path("/")
        .http_only(settings.http_only)
        .secure(settings.secure)
        .same_site(settings.same_site)
        .max_age(Duration::seconds(settings.max_age_seconds))
        .finish()
}

/// Expired cookie that makes the browser drop the device secret
pub fn removal_cookie(settings: &DeviceCookieSettings) -> Cookie<'static> {
    let mut cookie = Cookie::build(settings.name.clone(), "")
        .path("/")
        .http_only(settings.http_only)
        .secure(settings.secure)
        .same_site(settings.same_site)
        .finish();
    cookie.make_removal();
    cookie
}

pub fn read_device_cookie(req: &HttpRequest, settings: &DeviceCookieSettings) -> Option<String> {
    req.cookie(&settings.name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::cookie::SameSite;

    fn settings() -> DeviceCookieSettings {
        DeviceCookieSettings {
            name: "gm_trusted_device".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age_seconds: 30 * 86400,
        }
    }

    #[test]
    fn test_issued_cookie_attributes() {
        let cookie = trusted_device_cookie(&settings(), "device.secret".to_string());

        assert_eq!(cookie.name(), "gm_trusted_device");
        assert_eq!(cookie.value(), "device.secret");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(Duration::days(30)));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie(&settings());
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
