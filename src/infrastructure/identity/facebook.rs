//! Facebook Graph identity verifier.
//!
//! Verifies client-supplied Facebook access tokens against the Graph
//! `debug_token` endpoint using the app access token. One outbound call per
//! credential, no retries, no caching.
//!
//! Response interpretation is a pure function so the rejection paths are
//! testable without the network.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::FacebookSettings;
use crate::domain::services::{IdentityVerifier, VerificationError, VerifiedIdentity};
use crate::domain::Identity;

/// Graph API `debug_token` response envelope.
///
/// Rejected tokens arrive either as `data.is_valid == false` (with a nested
/// error) or as a top-level `error` object, depending on what exactly was
/// wrong with the request.
#[derive(Debug, Deserialize)]
struct DebugTokenResponse {
    data: Option<DebugTokenData>,
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct DebugTokenData {
    #[serde(default)]
    is_valid: bool,
    user_id: Option<String>,
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

/// Identity verifier backed by the Facebook Graph API.
#[derive(Clone)]
pub struct FacebookVerifier {
    client: reqwest::Client,
    app_access_token: String,
    graph_url: String,
}

impl FacebookVerifier {
    /// Create a verifier from provider settings.
    pub fn new(settings: &FacebookSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            app_access_token: settings.app_access_token(),
            graph_url: settings.graph_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for FacebookVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, VerificationError> {
        let url = format!("{}/debug_token", self.graph_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("input_token", credential),
                ("access_token", self.app_access_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| VerificationError::Network(e.to_string()))?;

        let status = response.status();

        // Graph reports rejected tokens with a JSON error body and a 4xx
        // status; read the body regardless of status and interpret it
        // uniformly.
        let body = response
            .text()
            .await
            .map_err(|e| VerificationError::Network(e.to_string()))?;

        debug!(status = %status, "debug_token response received");

        let parsed: DebugTokenResponse = serde_json::from_str(&body).map_err(|e| {
            VerificationError::InvalidResponse(format!(
                "debug_token response not parseable ({}): {}",
                status, e
            ))
        })?;

        interpret(parsed)
    }
}

/// Turn a parsed `debug_token` response into a verified identity or a
/// rejection.
fn interpret(response: DebugTokenResponse) -> Result<VerifiedIdentity, VerificationError> {
    if let Some(error) = response.error {
        return Err(VerificationError::Rejected(error.message));
    }

    let data = response
        .data
        .ok_or_else(|| VerificationError::InvalidResponse("missing data envelope".to_string()))?;

    if !data.is_valid {
        let cause = data
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "token reported invalid".to_string());
        return Err(VerificationError::Rejected(cause));
    }

    let user_id = data
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            VerificationError::InvalidResponse("valid token without user_id".to_string())
        })?;

    // debug_token carries no display fields; profile provisioning applies
    // its defaults.
    Ok(VerifiedIdentity {
        identity: Identity::new(user_id),
        display_name: None,
        avatar_url: None,
    })
}
