//! Fleet Dashboard Backend
//!
//! REST backend for the fleet dashboard. Every table lives as a JSON file in a
//! GitHub repository chosen at login.

mod api;
mod auth;
mod config;
mod errors;
mod github;
mod models;
mod store;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use config::{Config, LogFormat};
use github::{GitHubApi, HttpGitHub, MemoryGitHub};
use views::ViewRegistry;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<dyn GitHubApi>,
    pub sessions: Arc<SessionStore>,
    pub views: Arc<ViewRegistry>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let (text, json) = match config.log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text)
        .with(json)
        .init();

    tracing::info!("Starting Fleet Dashboard Backend");
    tracing::info!("Views directory: {:?}", config.views_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    let github: Arc<dyn GitHubApi> = match &config.offline_token {
        Some(token) => {
            tracing::warn!("FLEET_OFFLINE_TOKEN is set: using the in-memory GitHub backend, data is not persisted");
            Arc::new(MemoryGitHub::new().with_account(token, "offline"))
        }
        None => {
            tracing::info!("GitHub API: {}", config.github_api_url);
            Arc::new(HttpGitHub::new(&config.github_api_url, config.github_timeout)?)
        }
    };

    // Create application state
    let state = AppState {
        github,
        sessions: Arc::new(SessionStore::with_ttl(config.session_ttl)),
        views: Arc::new(ViewRegistry::new(config.views_dir.clone())),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that require a session
    let protected_routes = Router::new()
        // Session
        .route("/session", get(api::current_session))
        .route("/session/logout", post(api::logout))
        // Raw tables
        .route("/tables/{table}", get(api::read_table).put(api::write_table))
        // Views
        .route("/views/{view}", get(api::load_view))
        .route("/views/{view}/init", post(api::init_view))
        .route(
            "/views/{view}/controls/{element}",
            post(api::dispatch_control),
        )
        // Drivers
        .route("/drivers", get(api::list_drivers).post(api::create_driver))
        .route("/drivers/{id}", get(api::get_driver).put(api::update_driver))
        // Cars
        .route("/cars", get(api::list_cars).post(api::create_car))
        .route("/cars/{id}", get(api::get_car).put(api::update_car))
        // Cards
        .route("/cards", get(api::list_cards).post(api::create_card))
        .route("/cards/{id}", get(api::get_card).put(api::update_card))
        // Tenders
        .route("/tenders", get(api::list_tenders).post(api::create_tender))
        .route("/tenders/{id}", get(api::get_tender).put(api::update_tender))
        .route("/tenders/{id}/assign", post(api::assign_tender))
        // Invoices
        .route("/invoices", get(api::list_invoices).post(api::create_invoice))
        .route("/invoices/{id}", get(api::get_invoice).put(api::update_invoice))
        // Admin
        .route("/users", get(api::list_users).post(api::create_user))
        .route("/users/{id}", get(api::get_user).put(api::update_user))
        .route("/statuses", get(api::list_statuses).post(api::create_status))
        .route("/statuses/{id}", get(api::get_status).put(api::update_status))
        // Chat
        .route("/chat", get(api::list_messages).post(api::send_message))
        // Dashboard
        .route("/dashboard", get(api::get_dashboard))
        // Apply session auth middleware
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth::session_auth_layer,
        ));

    // Login and registration create the session
    let public_routes = Router::new()
        .route("/session/login", post(api::login))
        .route("/session/register", post(api::register));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", protected_routes.merge(public_routes))
        .merge(health_routes)
        .nest_service("/views", ServeDir::new(&state.config.views_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
