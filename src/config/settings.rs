//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Redis configuration
    pub redis: RedisSettings,

    /// Session token settings
    pub auth: AuthSettings,

    /// Identity provider (Facebook Graph) settings
    pub facebook: FacebookSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// WebSocket configuration
    pub websocket: WebSocketSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Redis configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    /// Redis connection URL
    pub url: String,

    /// Connection pool size
    pub pool_size: u32,

    /// Optional namespace prepended to every key
    pub key_prefix: Option<String>,
}

/// Session token configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// Session token time-to-live in seconds
    pub session_ttl_secs: u64,
}

/// Facebook Graph API configuration for identity verification.
#[derive(Debug, Clone, Deserialize)]
pub struct FacebookSettings {
    /// Facebook application ID
    pub app_id: String,

    /// Facebook application secret
    pub app_secret: String,

    /// Graph API base URL (overridable for tests)
    pub graph_url: String,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// WebSocket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// Maximum message size in bytes (default: 64KB)
    pub max_message_size: usize,

    /// Maximum frame size in bytes (default: 16KB)
    pub max_frame_size: usize,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if identity-provider credentials are missing in production.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("redis.pool_size", 10)?
            .set_default("auth.session_ttl_secs", 3600_i64)?
            .set_default("facebook.app_id", "")?
            .set_default("facebook.app_secret", "")?
            .set_default("facebook.graph_url", "https://graph.facebook.com")?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // WebSocket settings - limits to prevent oversized frames
            .set_default("websocket.max_message_size", 65536_i64)? // 64KB
            .set_default("websocket.max_frame_size", 16384_i64)?   // 16KB
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option(
                "server.host",
                std::env::var("SERVER_HOST").ok(),
            )?
            .set_override_option(
                "server.port",
                std::env::var("SERVER_PORT").ok(),
            )?
            .set_override_option(
                "database.url",
                std::env::var("DATABASE_URL").ok(),
            )?
            .set_override_option(
                "redis.url",
                std::env::var("REDIS_URL").ok(),
            )?
            .set_override_option(
                "facebook.app_id",
                std::env::var("FACEBOOK_APP_ID").ok(),
            )?
            .set_override_option(
                "facebook.app_secret",
                std::env::var("FACEBOOK_APP_SECRET").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                // Production must not boot without provider credentials
                if settings.environment == "production"
                    && (settings.facebook.app_id.is_empty()
                        || settings.facebook.app_secret.is_empty())
                {
                    return Err(ConfigError::Message(
                        "FACEBOOK_APP_ID and FACEBOOK_APP_SECRET are required in production"
                            .into(),
                    ));
                }
                if settings.auth.session_ttl_secs == 0 {
                    return Err(ConfigError::Message(
                        "auth.session_ttl_secs must be greater than zero".into(),
                    ));
                }
                Ok(settings)
            })
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerSettings {
    /// Get the socket address for binding.
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid server address configuration")
    }
}

impl FacebookSettings {
    /// App access token used for `debug_token` calls.
    pub fn app_access_token(&self) -> String {
        format!("{}|{}", self.app_id, self.app_secret)
    }
}
