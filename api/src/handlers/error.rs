//! Mapping from domain errors to HTTP responses.
//!
//! Client-facing bodies stay as coarse as the error taxonomy: credential,
//! verification and token failures keep their single opaque kinds, and
//! internal faults (including malformed digests) surface as a generic 500
//! while the detail goes to the server log only.

use actix_web::HttpResponse;

use th_core::errors::{AuthError, DomainError, TokenError};
use th_shared::types::ApiResponse;

/// Convert a domain error into the corresponding HTTP response
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => handle_auth_error(auth_error),
        DomainError::Token(token_error) => handle_token_error(token_error),
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("VALIDATION_ERROR", message.clone())),
        DomainError::NotFound { resource } => HttpResponse::NotFound().json(
            ApiResponse::<()>::error("NOT_FOUND", format!("{} not found", resource)),
        ),
        DomainError::Credential(credential_error) => {
            // Integrity fault, never a client error
            log::error!("credential fault: {}", credential_error);
            internal_error()
        }
        DomainError::Internal { message } => {
            log::error!("internal error: {}", message);
            internal_error()
        }
    }
}

fn handle_auth_error(error: &AuthError) -> HttpResponse {
    let body = ApiResponse::<()>::error(error.code(), error.to_string());

    match error {
        AuthError::InvalidCredentials
        | AuthError::EmailNotVerified
        | AuthError::AccountDisabled => HttpResponse::Unauthorized().json(body),
        AuthError::EmailAlreadyRegistered
        | AuthError::EmailAlreadyVerified
        | AuthError::InvalidOrExpiredCode
        | AuthError::RoleMismatch => HttpResponse::BadRequest().json(body),
        AuthError::AccountNotFound => HttpResponse::NotFound().json(body),
        AuthError::RegistrationDisabled => HttpResponse::Forbidden().json(body),
    }
}

fn handle_token_error(error: &TokenError) -> HttpResponse {
    let body = ApiResponse::<()>::error(error.code(), error.to_string());

    match error {
        TokenError::InvalidOrExpiredToken | TokenError::InvalidRefreshToken => {
            HttpResponse::Unauthorized().json(body)
        }
        TokenError::TokenGenerationFailed => {
            log::error!("token generation failed");
            internal_error()
        }
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::<()>::error(
        "INTERNAL_ERROR",
        "Internal Server Error",
    ))
}
