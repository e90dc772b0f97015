use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ResendVerificationRequest;
use crate::handlers::error::handle_domain_error;

use super::validation_failure;

/// Handler for POST /api/v1/auth/resend-verification
///
/// Reissues a fresh verification code for an unverified account. The
/// response body is byte-identical whether or not the email exists, so the
/// endpoint cannot be used to enumerate accounts; only an already-verified
/// email answers differently.
pub async fn resend_verification<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<ResendVerificationRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    match state.account_service.resend_verification(&request.email).await {
        Ok(code) => {
            if let Some(code) = code {
                state
                    .notifier
                    .deliver_verification_code(&request.email, &code);
            }

            HttpResponse::Ok().json(ApiResponse::message(
                "If the email exists and is not verified, a new verification code has been sent.",
            ))
        }
        Err(error) => handle_domain_error(&error),
    }
}
