//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure. The suite runs the
//! real router with in-process fakes behind the verifier, profile, and
//! token-store seams, so no Facebook, Postgres, or Redis is needed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use futures::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;

use dicehall::application::services::SessionAuthority;
use dicehall::config::{
    AuthSettings, CorsSettings, DatabaseSettings, FacebookSettings, RedisSettings, ServerSettings,
    Settings, WebSocketSettings,
};
use dicehall::domain::services::{IdentityVerifier, VerificationError, VerifiedIdentity};
use dicehall::domain::{Identity, PlayerProfile, PlayerRepository};
use dicehall::infrastructure::store::InMemoryTtlStore;
use dicehall::presentation::http::routes;
use dicehall::presentation::websocket::RoomRegistry;
use dicehall::shared::error::AppError;
use dicehall::startup::AppState;

/// Verifier fake: credentials of the form `fb-token-<id>` verify as `<id>`,
/// everything else is rejected.
pub struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerificationError> {
        match credential.strip_prefix("fb-token-") {
            Some(user_id) if !user_id.is_empty() => Ok(VerifiedIdentity {
                identity: Identity::new(user_id),
                display_name: Some(format!("Player {user_id}")),
                avatar_url: None,
            }),
            _ => Err(VerificationError::Rejected(
                "credential not recognized".to_string(),
            )),
        }
    }
}

/// Profile repository fake backed by a map
#[derive(Default)]
pub struct InMemoryPlayerRepository {
    players: RwLock<HashMap<String, PlayerProfile>>,
}

impl InMemoryPlayerRepository {
    pub fn count(&self) -> usize {
        self.players.read().len()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<PlayerProfile>, AppError> {
        Ok(self.players.read().get(identity.as_str()).cloned())
    }

    async fn get_or_create(&self, candidate: &PlayerProfile) -> Result<PlayerProfile, AppError> {
        let mut players = self.players.write();
        Ok(players
            .entry(candidate.player_id.to_string())
            .or_insert_with(|| candidate.clone())
            .clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseSettings {
            url: "postgres://localhost/dicehall_test".to_string(),
            max_connections: 2,
            min_connections: 1,
            acquire_timeout: 5,
        },
        redis: RedisSettings {
            url: "redis://localhost:6379".to_string(),
            pool_size: 2,
            key_prefix: None,
        },
        auth: AuthSettings {
            session_ttl_secs: 3600,
        },
        facebook: FacebookSettings {
            app_id: "test-app".to_string(),
            app_secret: "test-secret".to_string(),
            graph_url: "https://graph.facebook.invalid".to_string(),
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        websocket: WebSocketSettings {
            max_message_size: 65536,
            max_frame_size: 16384,
        },
        environment: "test".to_string(),
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub sessions: Arc<SessionAuthority>,
    pub rooms: Arc<RoomRegistry>,
    pub players: Arc<InMemoryPlayerRepository>,
}

impl TestApp {
    /// Create a new test application with fake dependencies
    pub fn new() -> Self {
        Self::with_session_ttl(3600)
    }

    /// Create a test application issuing tokens with the given TTL
    pub fn with_session_ttl(ttl_secs: u64) -> Self {
        let sessions = Arc::new(SessionAuthority::new(
            Arc::new(InMemoryTtlStore::new()),
            ttl_secs,
        ));
        let rooms = Arc::new(RoomRegistry::new());
        let players = Arc::new(InMemoryPlayerRepository::default());

        let state = AppState {
            sessions: sessions.clone(),
            rooms: rooms.clone(),
            verifier: Arc::new(StubVerifier),
            players: players.clone(),
            settings: Arc::new(test_settings()),
        };

        Self {
            router: routes::create_router(state),
            sessions,
            rooms,
            players,
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a request carrying a raw `Authorization` header value
    pub async fn request_with_authorization(
        &self,
        method: &str,
        uri: &str,
        authorization: &str,
    ) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Authorization", authorization)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make an authenticated GET request
    pub async fn get_auth(&self, uri: &str, token: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post_json_auth(
        &self,
        uri: &str,
        body: &str,
        token: &str,
    ) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Run the full authentication flow and return the response body
    pub async fn authenticate(&self, credential: &str) -> serde_json::Value {
        let body = serde_json::json!({ "credential": credential }).to_string();
        let response = self.post_json("/api/v1/auth", &body).await;
        assert_eq!(response.status(), 200, "authentication was rejected");
        response_json(response).await
    }

    /// Authenticate as `user_id` and return just the session token
    pub async fn session_token_for(&self, user_id: &str) -> String {
        let body = self.authenticate(&format!("fb-token-{user_id}")).await;
        body["session_token"].as_str().unwrap().to_string()
    }

    /// Serve the router on an ephemeral local port for real-socket tests
    pub async fn spawn(self) -> SpawnedApp {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.router;
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        SpawnedApp {
            addr,
            sessions: self.sessions,
            rooms: self.rooms,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A test application bound to a real listener
pub struct SpawnedApp {
    pub addr: SocketAddr,
    pub sessions: Arc<SessionAuthority>,
    pub rooms: Arc<RoomRegistry>,
}

impl SpawnedApp {
    /// Issue a session token directly against the running authority
    pub async fn issue_token(&self, user_id: &str) -> String {
        self.sessions
            .issue(&Identity::new(user_id))
            .await
            .unwrap()
            .token
    }
}

/// Read a response body as JSON
pub async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("body is not JSON: {e}"))
}

/// Client side of a test WebSocket connection
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Open a WebSocket connection to the gateway presenting a token
pub async fn connect_ws(
    addr: SocketAddr,
    token: &str,
) -> Result<WsClient, tokio_tungstenite::tungstenite::Error> {
    connect_gateway(addr, &format!("?token={token}")).await
}

/// Open a WebSocket connection with a raw query string (may be empty)
pub async fn connect_gateway(
    addr: SocketAddr,
    query: &str,
) -> Result<WsClient, tokio_tungstenite::tungstenite::Error> {
    let url = format!("ws://{addr}/gateway{query}");
    let (stream, _response) = connect_async(url).await?;
    Ok(stream)
}

/// HTTP status carried by a rejected WebSocket handshake
pub fn ws_rejection_status(err: tokio_tungstenite::tungstenite::Error) -> u16 {
    match err {
        tokio_tungstenite::tungstenite::Error::Http(response) => response.status().as_u16(),
        other => panic!("expected HTTP rejection, got: {other}"),
    }
}

/// Send a JSON frame over a test connection
pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    ws.send(WsMessage::Text(value.to_string().into()))
        .await
        .expect("failed to send frame");
}

/// Receive the next JSON text frame, skipping control frames
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed while waiting for frame")
            .expect("websocket error while waiting for frame");

        match frame {
            WsMessage::Text(text) => {
                return serde_json::from_str(&text).expect("frame is not valid JSON");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Poll until `condition` holds or a 2 second deadline passes
pub async fn wait_until(mut condition: impl FnMut() -> bool, what: &str) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
