use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ForgotPasswordRequest;
use crate::handlers::error::handle_domain_error;

use super::validation_failure;

/// Handler for POST /api/v1/auth/forgot-password
///
/// Issues a password reset code with a one-hour window. The response is
/// byte-identical whether or not the email maps to an account; the branch
/// taken is observable server-side only.
pub async fn forgot_password<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    match state
        .account_service
        .request_password_reset(&request.email)
        .await
    {
        Ok(code) => {
            if let Some(code) = code {
                state.notifier.deliver_reset_code(&request.email, &code);
            }

            HttpResponse::Ok().json(ApiResponse::message(
                "If the email exists, a password reset link has been sent.",
            ))
        }
        Err(error) => handle_domain_error(&error),
    }
}
