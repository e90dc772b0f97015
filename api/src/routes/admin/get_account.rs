use actix_web::{web, HttpResponse};
use uuid::Uuid;

use th_core::repositories::AccountDirectory;
use th_shared::types::ApiResponse;

use crate::app::AppState;
use crate::dto::auth::ProfileResponse;
use crate::handlers::error::handle_domain_error;

/// Handler for GET /api/v1/admin/accounts/{id}
///
/// Administrator-only directory lookup; the role gate runs in middleware
/// before this handler is reached.
pub async fn get_account<D>(
    state: web::Data<AppState<D>>,
    path: web::Path<String>,
) -> HttpResponse
where
    D: AccountDirectory + 'static,
{
    let id = match Uuid::parse_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => {
            return HttpResponse::BadRequest().json(ApiResponse::<()>::error(
                "VALIDATION_ERROR",
                "Invalid account id",
            ));
        }
    };

    match state.directory.find_by_id(id).await {
        Ok(Some(account)) => HttpResponse::Ok().json(ProfileResponse::from(&account)),
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::<()>::error(
            "ACCOUNT_NOT_FOUND",
            "Account not found",
        )),
        Err(error) => handle_domain_error(&error),
    }
}
