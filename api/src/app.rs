//! Application factory
//!
//! Builds the Actix-web application from the shared state and configuration.
//! Used by the binary for every worker and by the integration tests.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, App, Error, HttpRequest,
};
use gm_shared::AppConfig;
use tracing_actix_web::TracingLogger;

use crate::handlers::error::{not_found, ApiError};
use crate::middleware::{create_cors, SecurityMiddleware};
use crate::routes;
use crate::state::AppState;

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    config: &AppConfig,
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
        .app_data(
            web::JsonConfig::default()
                .limit(config.server.max_payload_size)
                .error_handler(json_error),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        // The last wrap is outermost
        .wrap(SecurityMiddleware::for_environment(config.environment))
        .wrap(create_cors(&config.cors))
        .wrap(TracingLogger::default())
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

fn json_error(error: JsonPayloadError, _req: &HttpRequest) -> Error {
    ApiError::BadRequest(format!("Invalid JSON body: {}", error)).into()
}

fn query_error(error: QueryPayloadError, _req: &HttpRequest) -> Error {
    ApiError::BadRequest(format!("Invalid query string: {}", error)).into()
}

fn path_error(error: PathError, _req: &HttpRequest) -> Error {
    ApiError::BadRequest(format!("Invalid path parameter: {}", error)).into()
}
