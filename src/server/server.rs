//! HTTP server core implementation

use crate::config::{Config, ServerConfig};
use crate::server::handlers::{checkout, health_check};
use crate::server::middleware::RequestTimingMiddleware;
use crate::server::state::AppState;
use crate::utils::error::{PipelineError, Result};
use actix_web::{App, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use tracing::info;

/// Routes served by the demo application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/checkout", web::post().to(checkout));
}

/// HTTP server
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: &Config, state: AppState) -> Self {
        Self {
            config: config.server.clone(),
            state,
        }
    }

    /// Create the Actix-web application
    fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let timing = RequestTimingMiddleware::new(state.pipeline.clone());

        App::new()
            .app_data(state)
            .wrap(DefaultHeaders::new().add(("Server", "scopelog")))
            .wrap(timing)
            .configure(configure_routes)
    }

    /// Serve until the process is asked to stop
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);
        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .bind(&bind_addr)
            .map_err(|e| PipelineError::Config(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);
        server.await?;

        info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
