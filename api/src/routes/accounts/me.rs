use actix_web::{web, HttpResponse};

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ProfileResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/accounts/me
///
/// Returns the authenticated account's profile, including the role-specific
/// sub-record when the profile has been completed.
pub async fn me<D>(state: web::Data<AppState<D>>, auth: AuthContext) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    match state.directory.find_by_id(auth.account_id).await {
        Ok(Some(account)) => HttpResponse::Ok().json(ProfileResponse::from(&account)),
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::<()>::error(
            "ACCOUNT_NOT_FOUND",
            "Account not found",
        )),
        Err(error) => handle_domain_error(&error),
    }
}
