//! Server construction and wiring.

mod config;

pub use config::{AppConfig, ConfigError, SmtpConfig};

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use tracing::warn;

use crate::domain::ports::EmailRepository;
use crate::domain::{ConversionService, SignupService, UsageGate};
use crate::inbound::http::health::HealthState;
use crate::inbound::http::{admin, convert, health, signup, AdminToken, HttpState};
use crate::middleware::Trace;
use crate::outbound::mailer::SmtpSignupNotifier;
use crate::outbound::mirror::CsvFileMirror;
use crate::outbound::persistence::{migrations, DbPool, DieselEmailRepository, PoolConfig};

/// Assemble the handler state from configuration and a repository.
///
/// The notifier and mirror are attached only when configured; a notifier
/// that fails to build (bad relay or address) is logged and skipped rather
/// than aborting startup, matching its best-effort role.
///
/// # Errors
///
/// Fails when the artifact directory cannot be created.
pub fn build_state(
    config: &AppConfig,
    repository: Arc<dyn EmailRepository>,
) -> std::io::Result<HttpState> {
    let gate = Arc::new(UsageGate::new(config.usage_gate_capacity));
    let converter = Arc::new(ConversionService::new(
        &config.artifact_dir,
        config.artifact_retention,
    )?);

    let mut signup_service = SignupService::new(repository.clone(), gate.clone());
    if let Some(smtp) = &config.smtp {
        match SmtpSignupNotifier::new(&smtp.relay, &smtp.username, &smtp.password, &smtp.notify_to)
        {
            Ok(notifier) => signup_service = signup_service.with_notifier(Arc::new(notifier)),
            Err(err) => warn!(error = %err, "signup notifier disabled"),
        }
    }
    if let Some(path) = &config.email_mirror_path {
        signup_service = signup_service.with_mirror(Arc::new(CsvFileMirror::new(path)));
    }

    Ok(HttpState {
        gate,
        converter,
        signup: Arc::new(signup_service),
        emails: repository,
        admin_token: AdminToken::new(&config.admin_token),
    })
}

/// Build the actix application with all routes and middleware.
pub fn build_app(
    state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .app_data(health_state)
        .wrap(Trace)
        .service(convert::upload_form)
        .service(convert::convert)
        .service(signup::signup_form)
        .service(signup::submit_signup)
        .service(admin::list_emails)
        .service(admin::export_emails)
        .service(health::ready)
        .service(health::live)
}

/// Run migrations, build the pool and state, and serve until shutdown.
///
/// # Errors
///
/// Fails when the database is unreachable, a migration cannot apply, the
/// artifact directory cannot be created, or the listen address is taken.
pub async fn run(config: AppConfig) -> std::io::Result<()> {
    migrations::run_pending(&config.database_url).map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(&config.database_url))
        .await
        .map_err(std::io::Error::other)?;
    let repository: Arc<dyn EmailRepository> = Arc::new(DieselEmailRepository::new(pool));

    let state = web::Data::new(build_state(&config, repository)?);
    let health_state = web::Data::new(HealthState::new());
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || build_app(state.clone(), server_health_state.clone()))
        .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}
