//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::SessionAuthority;
use crate::config::Settings;
use crate::domain::services::IdentityVerifier;
use crate::domain::PlayerRepository;
use crate::infrastructure::identity::FacebookVerifier;
use crate::infrastructure::repositories::PgPlayerRepository;
use crate::infrastructure::{database, store};
use crate::presentation::http::handlers::health;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::presentation::websocket::RoomRegistry;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionAuthority>,
    pub rooms: Arc<RoomRegistry>,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub players: Arc<dyn PlayerRepository>,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        // Create database pool and apply migrations
        let db = database::create_pool(&settings.database).await?;
        database::run_migrations(&db).await?;
        tracing::info!("Database connection pool created");

        // Session token store
        let token_store = store::create_redis_store(&settings.redis).await?;
        let sessions = Arc::new(SessionAuthority::new(
            Arc::new(token_store),
            settings.auth.session_ttl_secs,
        ));

        // Identity provider client
        let verifier: Arc<dyn IdentityVerifier> =
            Arc::new(FacebookVerifier::new(&settings.facebook));

        // Profile repository
        let players: Arc<dyn PlayerRepository> = Arc::new(PgPlayerRepository::new(db));

        // Room registry
        let rooms = Arc::new(RoomRegistry::new());

        health::init_server_start();

        // Create app state
        let state = AppState {
            sessions,
            rooms,
            verifier,
            players,
            settings: Arc::new(settings.clone()),
        };

        // Build router with middleware
        let router = routes::create_router(state)
            .layer(logging::create_trace_layer())
            .layer(cors::create_cors_layer(&settings.cors));

        // Bind to address
        let addr = settings.server.socket_addr();
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
