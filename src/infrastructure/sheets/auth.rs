//! Google service-account authentication

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::application::errors::SheetsError;

/// Scopes needed to find a spreadsheet by name and append to it
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Lifetime requested for each assertion
const ASSERTION_TTL_SECS: i64 = 3600;

/// The fields of a service-account key file we use
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub async fn load(path: &Path) -> Result<Self, SheetsError> {
        let content = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| SheetsError::Credentials(format!("{}: {}", path.display(), e)))
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Sign the RS256 assertion for the token exchange
pub fn build_assertion(key: &ServiceAccountKey, now: i64) -> Result<String, SheetsError> {
    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPES.join(" "),
        aud: &key.token_uri,
        iat: now,
        exp: now + ASSERTION_TTL_SECS,
    };

    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| SheetsError::Credentials(format!("invalid private key: {e}")))?;

    encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| SheetsError::Credentials(format!("failed to sign assertion: {e}")))
}

/// Exchange a signed assertion for an OAuth access token
pub async fn fetch_access_token(client: &Client, key: &ServiceAccountKey) -> Result<String, SheetsError> {
    let assertion = build_assertion(key, chrono::Utc::now().timestamp())?;

    let response = client
        .post(&key.token_uri)
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await
        .map_err(|e| SheetsError::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SheetsError::Auth(format!("status: {}, body: {}", status, body)));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| SheetsError::Auth(e.to_string()))?;

    Ok(token.access_token)
}
