use actix_web::{web, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use th_core::services::account::{AccountService, AccountServiceConfig};
use th_core::services::credential::CredentialHasher;
use th_core::services::session::{SessionTokenCodec, SessionTokenConfig};
use th_infra::{create_pool, MySqlAccountDirectory};
use th_shared::config::AppConfig;

use th_api::app::{create_app, AppState, LogNotifier};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting TutorHub API server");

    // Load configuration once; the secret never changes after this point
    let config = AppConfig::from_env();
    if config.auth.session.is_using_default_secret() && config.environment.is_production() {
        panic!("SECRET_KEY must be set in production");
    }

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    // Wire the persistence and domain layers
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database pool");
    let directory = Arc::new(MySqlAccountDirectory::new(pool));

    let codec = Arc::new(
        SessionTokenCodec::new(SessionTokenConfig::from(&config.auth.session))
            .expect("Failed to initialize session token codec"),
    );

    let account_service = Arc::new(AccountService::new(
        directory.clone(),
        CredentialHasher::new(config.auth.bcrypt_cost),
        codec.clone(),
        AccountServiceConfig {
            verification_code_ttl_hours: config.auth.verification_code_ttl_hours,
            reset_code_ttl_minutes: config.auth.reset_code_ttl_minutes,
            allow_registration: true,
        },
    ));

    let state = web::Data::new(AppState {
        account_service,
        directory,
        codec,
        cookies: config.auth.cookies.clone(),
        notifier: Arc::new(LogNotifier),
    });

    HttpServer::new(move || create_app(state.clone()))
        .bind(&bind_address)?
        .run()
        .await
}
