use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, web::ServiceConfig, App, HttpServer};
use log::*;
use login_engine::{CredentialStore, CustomerDirectory, HttpCustomerDirectory, IdentityApi, RegistrationApi};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, LoginRoute, RegisterRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let credentials = CredentialStore::load(&config.users_file)?;
    let directory = HttpCustomerDirectory::new(config.directory.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!(
        "🚀️ Using customer directory at {} (timeout {}s). Dev mode: {}. Verbose: {}",
        config.directory.base_url,
        config.directory.timeout.as_secs(),
        config.dev,
        config.verbose
    );
    let srv = create_server_instance(config, Arc::new(credentials), directory)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance<B>(
    config: ServerConfig,
    credentials: Arc<CredentialStore>,
    directory: B,
) -> Result<Server, ServerError>
where
    B: CustomerDirectory + Clone + Send + 'static,
{
    let srv = HttpServer::new(move || {
        let credentials = Arc::clone(&credentials);
        let directory = directory.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("login::access_log"))
            .configure(move |cfg| configure_routes(cfg, credentials, directory))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers the gateway's routes and the state they depend on. The credential store is shared by every worker, so
/// that users registered on one worker can log in on any other.
pub fn configure_routes<B>(cfg: &mut ServiceConfig, credentials: Arc<CredentialStore>, directory: B)
where B: CustomerDirectory + Clone + 'static {
    let identity_api = IdentityApi::new(directory.clone());
    let registration_api = RegistrationApi::new(directory, Arc::clone(&credentials));
    cfg.app_data(web::Data::from(credentials))
        .app_data(web::Data::new(identity_api))
        .app_data(web::Data::new(registration_api))
        .service(health)
        .service(LoginRoute::<B>::new())
        .service(RegisterRoute::<B>::new());
}
