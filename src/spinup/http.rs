//! HTTP transport for Spinup REST calls

use crate::error::{Result, SpinupError};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CSRF_COOKIE: &str = "XSRF-TOKEN";
const CSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Truncates long bodies and strips control characters before logging
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// `"404 Not Found"`-style status line
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Put,
    Post,
}

/// HTTP client wrapper holding the cookie jar and the captured CSRF token
#[derive(Clone)]
pub struct SpinupHttpClient {
    client: Client,
    csrf: Arc<RwLock<Option<String>>>,
}

impl SpinupHttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("spinup-cli/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SpinupError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            csrf: Arc::new(RwLock::new(None)),
        })
    }

    /// Last CSRF token seen in a response cookie
    pub async fn csrf_token(&self) -> Option<String> {
        self.csrf.read().await.clone()
    }

    /// GET a JSON document
    pub async fn get(&self, url: &str, token: Option<&str>) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let request = self.authorize(self.client.get(url), token);
        self.execute(Verb::Get, url, request).await
    }

    /// PUT a JSON body; the CSRF token is replayed when one was captured
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        token: Option<&str>,
        body: &B,
    ) -> Result<Value> {
        tracing::debug!("PUT {}", url);
        let mut request = self.authorize(self.client.put(url), token).json(body);
        if let Some(csrf) = self.csrf_token().await {
            request = request.header(CSRF_HEADER, csrf);
        }
        self.execute(Verb::Put, url, request).await
    }

    /// POST an urlencoded form; only the status matters to callers
    pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<()> {
        tracing::debug!("POST {}", url);
        let request = self.client.post(url).form(form);
        self.execute(Verb::Post, url, request).await.map(|_| ())
    }

    fn authorize(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(t) if !t.is_empty() => request.bearer_auth(t),
            _ => request,
        }
    }

    async fn execute(&self, verb: Verb, url: &str, request: RequestBuilder) -> Result<Value> {
        let start = Instant::now();
        let response = request.send().await.map_err(|source| SpinupError::Transport {
            endpoint: url.to_string(),
            source,
        })?;

        self.capture_csrf(&response).await;

        let status = response.status();
        let body = response.text().await.map_err(|source| SpinupError::Transport {
            endpoint: url.to_string(),
            source,
        })?;
        tracing::info!("{} {} -> {} in {:?}", verb_name(verb), url, status, start.elapsed());

        if !status.is_success() {
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            let endpoint = url.to_string();
            return Err(match (status, verb) {
                (StatusCode::NOT_FOUND, _) => SpinupError::NotFound(format!(
                    "resource not found: {}",
                    url.rsplit("/api/").next().unwrap_or(url)
                )),
                (_, Verb::Get) => SpinupError::Fetch {
                    status: status_line(status),
                    endpoint,
                },
                (_, Verb::Put) => SpinupError::Update {
                    status: status_line(status),
                    endpoint,
                },
                (_, Verb::Post) => SpinupError::Auth(format!("login failed: {}", status_line(status))),
            });
        }

        // login pages answer with html
        if verb == Verb::Post || body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| SpinupError::decode(url, e))
    }

    async fn capture_csrf(&self, response: &reqwest::Response) {
        let value = response
            .cookies()
            .find(|c| c.name() == CSRF_COOKIE)
            .map(|c| c.value().to_string());

        if let Some(raw) = value {
            let decoded = match urlencoding::decode(&raw) {
                Ok(v) => v.into_owned(),
                Err(_) => raw,
            };
            tracing::debug!("captured {} cookie", CSRF_COOKIE);
            *self.csrf.write().await = Some(decoded);
        }
    }
}

fn verb_name(verb: Verb) -> &'static str {
    match verb {
        Verb::Get => "GET",
        Verb::Put => "PUT",
        Verb::Post => "POST",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates() {
        let long = "a".repeat(500);
        let out = sanitize_for_log(&long);
        assert!(out.starts_with(&"a".repeat(200)));
        assert!(out.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("bad\r\nbody"), "badbody");
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(StatusCode::BAD_GATEWAY), "502 Bad Gateway");
    }
}
