use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::VerifyEmailRequest;
use crate::handlers::error::handle_domain_error;

use super::validation_failure;

/// Handler for POST /api/v1/auth/verify-email
///
/// Consumes a pending verification code. Wrong, consumed and expired codes
/// all answer with the same 400 body.
pub async fn verify_email<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<VerifyEmailRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    match state
        .account_service
        .verify_email(&request.email, &request.code)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message(
            "Email verified successfully! You can now log in.",
        )),
        Err(error) => handle_domain_error(&error),
    }
}
