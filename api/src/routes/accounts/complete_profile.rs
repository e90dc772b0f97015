use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::domain::entities::account::{Role, RoleProfile};
use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{CompleteProfileRequest, ProfileResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;
use crate::routes::auth::validation_failure;

/// Handler for POST /api/v1/accounts/complete-profile
///
/// Completes the authenticated account's profile: display name plus the
/// role-specific sub-record, written all-or-nothing. The required fields
/// depend on the account's role.
///
/// # Errors
/// - 400 Bad Request: missing role-specific fields
/// - 401 Unauthorized: missing or invalid session token
pub async fn complete_profile<D>(
    state: web::Data<AppState<D>>,
    auth: AuthContext,
    request: web::Json<CompleteProfileRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    let request = request.into_inner();

    // The profile variant is chosen by the authenticated role, so a caller
    // can never write another role's sub-record
    let profile = match auth.role {
        Role::Learner => match request.grade_level {
            Some(grade_level) => RoleProfile::Learner {
                grade_level,
                learning_goals: request.learning_goals,
            },
            None => return missing_field("grade_level"),
        },
        Role::Educator => match request.qualifications {
            Some(qualifications) => RoleProfile::Educator {
                qualifications,
                short_bio: request.short_bio,
            },
            None => return missing_field("qualifications"),
        },
        Role::Administrator => RoleProfile::Administrator {
            department: request.department,
        },
    };

    match state
        .account_service
        .complete_profile(auth.account_id, &request.full_name, profile)
        .await
    {
        Ok(account) => HttpResponse::Ok().json(ProfileResponse::from(&account)),
        Err(error) => handle_domain_error(&error),
    }
}

fn missing_field(field: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<()>::error(
        "VALIDATION_ERROR",
        format!("{} is required for this role", field),
    ))
}
