use actix_web::{web, HttpResponse};
use validator::Validate;

use th_core::repositories::AccountDirectory;

use crate::app::AppState;
use crate::dto::auth::{AccountDto, LoginRequest, LoginResponseDto};
use crate::handlers::error::handle_domain_error;

use super::{build_refresh_cookie, build_session_cookie, validation_failure};

/// Handler for POST /api/v1/auth/login
///
/// Opens a session for a verified account. The session token is returned in
/// the body and mirrored into an http-only cookie; the refresh token rides
/// its own http-only, same-site-restricted cookie.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "session_token": "…",
///     "refresh_token": "…",
///     "expires_in": 86400,
///     "account": { "account_id": "…", "email": "…", "role": "learner", "full_name": "…" }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: unknown email or wrong password (indistinguishable),
///   unverified email, or disabled account
pub async fn login<D>(
    state: web::Data<AppState<D>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_failure(errors);
    }

    match state
        .account_service
        .login(&request.email, &request.password)
        .await
    {
        Ok(login) => {
            let response = LoginResponseDto {
                session_token: login.session_token.clone(),
                refresh_token: login.refresh_token.clone(),
                expires_in: login.expires_in,
                account: AccountDto::from(&login.account),
            };

            HttpResponse::Ok()
                .cookie(build_session_cookie(&state.cookies, login.session_token))
                .cookie(build_refresh_cookie(&state.cookies, login.refresh_token))
                .json(response)
        }
        Err(error) => handle_domain_error(&error),
    }
}
