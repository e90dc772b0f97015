//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the actix-web application.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::{middleware::Logger, web, App, HttpResponse};

use th_core::repositories::AccountDirectory;
use th_core::services::account::AccountService;
use th_core::services::session::SessionTokenCodec;
use th_shared::config::CookieConfig;

use crate::middleware::{create_cors, RequireRole, SessionAuth};
use crate::routes::{accounts, admin, auth};

/// Delivery boundary for generated one-time codes.
///
/// The subsystem never sends email itself; the notification collaborator
/// receives the address and the code and owns the transport.
pub trait CodeNotifier: Send + Sync {
    fn deliver_verification_code(&self, email: &str, code: &str);
    fn deliver_reset_code(&self, email: &str, code: &str);
}

/// Development notifier: records delivery in the server log.
pub struct LogNotifier;

impl CodeNotifier for LogNotifier {
    fn deliver_verification_code(&self, email: &str, code: &str) {
        log::debug!("verification code for {}: {}", email, code);
    }

    fn deliver_reset_code(&self, email: &str, code: &str) {
        log::debug!("password reset code for {}: {}", email, code);
    }
}

/// Shared application state
pub struct AppState<D: AccountDirectory> {
    /// Account service orchestrating the credential lifecycle
    pub account_service: Arc<AccountService<D>>,
    /// Account directory for read-only queries outside the service
    pub directory: Arc<D>,
    /// Session token codec, shared with the authentication middleware
    pub codec: Arc<SessionTokenCodec>,
    /// Cookie settings for token transport
    pub cookies: CookieConfig,
    /// Notification collaborator for code delivery
    pub notifier: Arc<dyn CodeNotifier>,
}

/// Create and configure the application with all dependencies
pub fn create_app<D>(
    state: web::Data<AppState<D>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    D: AccountDirectory + 'static,
{
    let cors = create_cors();
    let session_auth = || {
        SessionAuth::new(
            state.codec.clone(),
            state.cookies.session_cookie_name.clone(),
        )
    };

    App::new()
        // Add application state
        .app_data(state.clone())
        // Add middleware
        .wrap(Logger::default())
        .wrap(cors)
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                // Public auth surface
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(auth::register::<D>))
                        .route("/verify-email", web::post().to(auth::verify_email::<D>))
                        .route(
                            "/resend-verification",
                            web::post().to(auth::resend_verification::<D>),
                        )
                        .route("/login", web::post().to(auth::login::<D>))
                        .route("/refresh", web::post().to(auth::refresh::<D>))
                        .route("/forgot-password", web::post().to(auth::forgot_password::<D>))
                        .route("/reset-password", web::post().to(auth::reset_password::<D>))
                        .route(
                            "/logout",
                            web::post().to(auth::logout::<D>).wrap(session_auth()),
                        ),
                )
                // Authenticated account surface
                .service(
                    web::scope("/accounts")
                        .wrap(session_auth())
                        .route("/me", web::get().to(accounts::me::<D>))
                        .route(
                            "/complete-profile",
                            web::post().to(accounts::complete_profile::<D>),
                        ),
                )
                // Administrator-only surface; SessionAuth is the outer wrap
                // so it runs before the role gate
                .service(
                    web::scope("/admin")
                        .wrap(RequireRole::administrator())
                        .wrap(session_auth())
                        .route("/accounts/{id}", web::get().to(admin::get_account::<D>)),
                ),
        )
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tutorhub-api"
    }))
}
