use actix_web::{web, HttpResponse};

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::removal_cookie;

/// Handler for POST /api/v1/auth/logout
///
/// Logs the account out everywhere: every refresh token is revoked, not
/// only the caller's. Requires authentication.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "success": true, "message": "Logged out successfully" }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: missing or invalid session token
pub async fn logout<D>(state: web::Data<AppState<D>>, auth: AuthContext) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    match state.account_service.logout(auth.account_id).await {
        Ok(()) => HttpResponse::Ok()
            .cookie(removal_cookie(state.cookies.session_cookie_name.clone()))
            .cookie(removal_cookie(state.cookies.refresh_cookie_name.clone()))
            .json(ApiResponse::message("Logged out successfully")),
        Err(error) => handle_domain_error(&error),
    }
}
