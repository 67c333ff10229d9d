//! Application state and factory
//!
//! This module holds the state shared by handlers and middleware and
//! provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, Error, HttpResponse,
};
use wd_core::{SessionAuthority, TokenService};
use wd_infra::{LogError, LogFacility, LoggerHandle};

use crate::routes::registry::RouteRegistry;

/// Services shared by every worker
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub sessions: Arc<dyn SessionAuthority>,
    pub logs: Arc<LogFacility>,
    /// Request logger used by the middleware
    pub api_logger: Arc<LoggerHandle>,
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenService>,
        sessions: Arc<dyn SessionAuthority>,
        logs: Arc<LogFacility>,
    ) -> Result<Self, LogError> {
        let api_logger = logs.api()?;

        Ok(Self {
            tokens,
            sessions,
            logs,
            api_logger,
        })
    }
}

/// Create and configure the application
///
/// Routes come exclusively from `registry`; unmatched paths get a JSON 404.
pub fn create_app(
    state: web::Data<AppState>,
    registry: Arc<RouteRegistry>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(|cfg| registry.configure(cfg))
        .default_service(web::route().to(not_found))
        .wrap(Logger::default())
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "not_found",
        "message": "The requested resource was not found"
    }))
}
