// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Telecare Server
//!
//! HTTP front end for the diagnosis engine. The engine is built once at startup and
//! shared with every handler through [`AppState`].

pub mod api;
pub mod config;

use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use telecare_diagnosis::DiagnosisEngine;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{diagnose, get_vocabulary, health_check, AppState};
use config::{HttpServerConfig, ServerConfig};

const DEFAULT_LOG_FILTER: &str = "telecare_server=info,telecare_diagnosis=info,tower_http=info";

/// Initialize tracing. `RUST_LOG` overrides the default filter.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

/// Build the application router around an already constructed engine.
pub fn build_router(state: AppState, config: &HttpServerConfig) -> Router {
    let router = Router::new()
        .route("/api/diagnose", post(diagnose))
        .route("/api/health", get(health_check))
        .route("/api/vocabulary", get(get_vocabulary))
        .with_state(state);

    let router = if config.enable_cors {
        router.layer(cors_layer(&config.cors_origins))
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        tracing::warn!("CORS: Allowing all origins (development mode). Set cors_origins in production!");
        return cors.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("CORS: Ignoring invalid origin {:?}", origin);
                None
            }
        })
        .collect();
    tracing::info!("CORS: Allowing origins: {:?}", origins);
    cors.allow_origin(AllowOrigin::list(parsed))
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    init_tracing(config.server.log_json)?;

    tracing::info!("Starting Telecare Server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;

    let engine = DiagnosisEngine::from_config(&config.engine)
        .context("Failed to initialise diagnosis engine")?;
    let status = engine.status();
    if !status.model_available {
        tracing::warn!(
            "Serving rule-based diagnoses only: {}",
            status
                .backend_unavailable_reason
                .as_deref()
                .unwrap_or("no model configured")
        );
    }

    let app = build_router(AppState::new(engine), &config.server);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cors_layer_ignores_bad_origins() {
        // Builds without panicking even when an origin is not a valid header value
        let _ = cors_layer(&["https://clinic.example".to_string(), "bad\norigin".to_string()]);
    }
}
