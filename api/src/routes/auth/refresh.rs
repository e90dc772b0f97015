use actix_web::{web, HttpRequest, HttpResponse};

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::{AccountDto, LoginResponseDto, RefreshTokenRequest};
use crate::handlers::error::handle_domain_error;

use super::{build_refresh_cookie, build_session_cookie};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a fresh session token. The presented token
/// is consumed and replaced (rotation); the new refresh token is set as a
/// cookie and returned in the body.
///
/// The refresh token is taken from the http-only cookie when present,
/// otherwise from the JSON body (non-browser clients).
///
/// # Errors
/// - 401 Unauthorized: missing, unknown, or already-rotated refresh token
pub async fn refresh<D>(
    req: HttpRequest,
    state: web::Data<AppState<D>>,
    request: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    let refresh_token = req
        .cookie(&state.cookies.refresh_cookie_name)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| request.and_then(|body| body.refresh_token.clone()));

    let refresh_token = match refresh_token {
        Some(token) => token,
        None => {
            return HttpResponse::Unauthorized().json(ApiResponse::<()>::error(
                "INVALID_REFRESH_TOKEN",
                "Refresh token not provided",
            ));
        }
    };

    match state.account_service.refresh(&refresh_token).await {
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
