use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::domain::entities::account::Role;
use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{RegisterRequest, RegisterResponse};
use crate::handlers::error::handle_domain_error;

use super::validation_failure;

/// Handler for POST /api/v1/auth/register
///
/// Creates an unverified account and hands the pending verification code to
/// the notification collaborator for delivery.
///
/// # Response
///
/// ## Success (201 Created)
/// ```json
/// {
///     "account_id": "550e8400-e29b-41d4-a716-446655440000",
///     "message": "Registration successful! Please check your email to verify your account."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: invalid email/password/role, or email already registered
/// - 403 Forbidden: registration disabled
pub async fn register<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    let role = match request.role.parse::<Role>() {
        Ok(role) => role,
        Err(_) => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error(
                "VALIDATION_ERROR",
                "Role must be learner, educator or administrator",
            ));
        }
    };

    match state
        .account_service
        .register(&request.email, &request.password, role)
        .await
    {
        Ok(outcome) => {
            state
                .notifier
                .deliver_verification_code(&request.email, &outcome.verification_code);

            HttpResponse::Created().json(RegisterResponse {
                account_id: outcome.account_id.to_string(),
                message: "Registration successful! Please check your email to verify your account."
                    .to_string(),
            })
        }
        Err(error) => handle_domain_error(&error),
    }
}
