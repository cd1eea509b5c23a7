//! Spinup authentication
//!
//! A session is authenticated either by a bearer token (a JWT minted by the
//! Spinup UI) or by a CAS username/password login whose session cookie then
//! rides along in the client's cookie jar.

use super::http::SpinupHttpClient;
use crate::error::{Result, SpinupError};
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

/// CAS server used when none is configured
pub const DEFAULT_CAS_URL: &str = "https://secure.its.yale.edu/cas";

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
    nbf: Option<i64>,
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| SpinupError::Auth(format!("invalid token timestamp: {}", secs)))
}

/// Checks that a token is a well-formed JWT valid at `now`.
pub fn validate_token_at(token: &str, now: DateTime<Utc>) -> Result<()> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(SpinupError::Auth("invalid token format".to_string()));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .or_else(|_| URL_SAFE.decode(parts[1]))
        .map_err(|e| SpinupError::Auth(format!("failed to decode token payload: {}", e)))?;

    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| SpinupError::Auth(format!("failed to parse token claims: {}", e)))?;

    let exp = claims
        .exp
        .ok_or_else(|| SpinupError::Auth("token has no expiration".to_string()))?;
    let nbf = claims
        .nbf
        .ok_or_else(|| SpinupError::Auth("token has no not-before time".to_string()))?;

    let exp = timestamp(exp)?;
    if now >= exp {
        return Err(SpinupError::Auth(format!("token expired at {}", exp.to_rfc3339())));
    }

    let nbf = timestamp(nbf)?;
    if now < nbf {
        return Err(SpinupError::Auth(format!(
            "token not valid before {}",
            nbf.to_rfc3339()
        )));
    }

    tracing::debug!("token valid until {}", exp.to_rfc3339());
    Ok(())
}

pub fn validate_token(token: &str) -> Result<()> {
    validate_token_at(token, Utc::now())
}

/// Logs into CAS on behalf of `service`; the session cookie lands in the
/// http client's jar.
pub async fn cas_login(
    http: &SpinupHttpClient,
    cas_url: &str,
    username: &str,
    password: &str,
    service: &str,
) -> Result<()> {
    let login = format!("{}/login", cas_url.trim_end_matches('/'));
    tracing::debug!("logging into cas (service: {}) as {}", service, username);

    http.post_form(
        &login,
        &[
            ("username", username),
            ("password", password),
            ("service", service),
        ],
    )
    .await?;

    tracing::info!("successfully logged into cas");
    Ok(())
}
