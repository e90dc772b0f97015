use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ResetPasswordRequest;
use crate::handlers::error::handle_domain_error;

use super::validation_failure;

/// Handler for POST /api/v1/auth/reset-password
///
/// Consumes a pending reset code and replaces the password. Wrong, consumed
/// and expired codes answer with the same 400 body.
pub async fn reset_password<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    match state
        .account_service
        .reset_password(&request.code, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message(
            "Password has been reset successfully. You can now log in.",
        )),
        Err(error) => handle_domain_error(&error),
    }
}
