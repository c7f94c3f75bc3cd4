use std::path::Path;
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::application::ports::TranscriptionError;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Fields of a service-account key file that the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, TranscriptionError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TranscriptionError::Authentication(format!("read {}: {e}", path.display()))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            TranscriptionError::Authentication(format!("parse {}: {e}", path.display()))
        })
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

/// Source of bearer tokens for Google APIs.
pub enum GoogleCredentials {
    ServiceAccount(ServiceAccountAuth),
    /// Fixed token, used against emulators and mock servers.
    Static(String),
}

impl GoogleCredentials {
    pub fn service_account(path: &Path, http: reqwest::Client) -> Result<Self, TranscriptionError> {
        let key = ServiceAccountKey::from_file(path)?;
        Ok(Self::ServiceAccount(ServiceAccountAuth::new(key, http)?))
    }

    pub async fn bearer_token(&self) -> Result<String, TranscriptionError> {
        match self {
            Self::ServiceAccount(auth) => auth.access_token().await,
            Self::Static(token) => Ok(token.clone()),
        }
    }
}

/// OAuth2 JWT-bearer flow for a service account, with the access token cached
/// until shortly before it expires.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    signing_key: EncodingKey,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self, TranscriptionError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| TranscriptionError::Authentication(format!("private key: {e}")))?;
        Ok(Self {
            key,
            signing_key,
            http,
            cached: Mutex::new(None),
        })
    }

    pub async fn access_token(&self) -> Result<String, TranscriptionError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        let fresh = self.exchange().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }

    fn signed_assertion(&self) -> Result<String, TranscriptionError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| TranscriptionError::Authentication(format!("sign assertion: {e}")))
    }

    async fn exchange(&self) -> Result<CachedToken, TranscriptionError> {
        let assertion = self.signed_assertion()?;
        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| TranscriptionError::Authentication(format!("token request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Authentication(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Authentication(format!("token body: {e}")))?;

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(3600));
        tracing::debug!(expires_in_secs = lifetime.as_secs(), "Obtained Google access token");

        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime.saturating_sub(REFRESH_MARGIN),
        })
    }
}
