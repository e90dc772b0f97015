//! Authentication route handlers
//!
//! This module contains all credential-lifecycle endpoints:
//! - Registration and email verification
//! - Login, token refresh and logout
//! - Password reset

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod resend_verification;
pub mod reset_password;
pub mod verify_email;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use refresh::refresh;
pub use register::register;
pub use resend_verification::resend_verification;
pub use reset_password::reset_password;
pub use verify_email::verify_email;

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::HttpResponse;

use th_shared::config::CookieConfig;
use th_shared::types::ApiResponse;

/// Refresh cookie lifetime in days
const REFRESH_COOKIE_DAYS: i64 = 7;

pub(crate) fn parse_same_site(value: &str) -> SameSite {
    match value.to_lowercase().as_str() {
        "lax" => SameSite::Lax,
        "none" => SameSite::None,
        _ => SameSite::Strict,
    }
}

/// http-only cookie carrying the refresh token
pub(crate) fn build_refresh_cookie(config: &CookieConfig, value: String) -> Cookie<'static> {
    Cookie::build(config.refresh_cookie_name.clone(), value)
        .path("/")
        .http_only(config.http_only)
        .secure(config.secure)
        .same_site(parse_same_site(&config.same_site))
        .max_age(CookieDuration::days(REFRESH_COOKIE_DAYS))
        .finish()
}

/// http-only cookie carrying the session token
pub(crate) fn build_session_cookie(config: &CookieConfig, value: String) -> Cookie<'static> {
    Cookie::build(config.session_cookie_name.clone(), value)
        .path("/")
        .http_only(config.http_only)
        .secure(config.secure)
        .same_site(parse_same_site(&config.same_site))
        .finish()
}

/// Expired cookie that removes the named cookie from the client
pub(crate) fn removal_cookie(name: String) -> Cookie<'static> {
    Cookie::build(name, "")
        .path("/")
        .max_age(CookieDuration::ZERO)
        .finish()
}

/// 400 response for request-shape validation failures
pub(crate) fn validation_failure(errors: validator::ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(
        "VALIDATION_ERROR",
        errors.to_string(),
    ))
}
