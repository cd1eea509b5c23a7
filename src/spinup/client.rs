//! Spinup client
//!
//! Session state for one invocation: base URL, bearer token and the http
//! transport (cookie jar plus CSRF token). Every typed call resolves its
//! URL through the target type's [`Endpoint`] impl.

use super::auth;
use super::endpoint::{Endpoint, Params, API_PREFIX};
use super::http::SpinupHttpClient;
use super::resource::Resource;
use super::secret::{Secret, SecretNames};
use super::size::{BaseSize, ComputeSize};
use super::space::SpaceDetail;
use crate::error::{Result, SpinupError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

#[derive(Clone)]
pub struct SpinupClient {
    pub http: SpinupHttpClient,
    base_url: String,
    token: Option<String>,
}

impl SpinupClient {
    /// Create a client for the Spinup instance at `url`
    pub fn new(url: &str, token: Option<String>) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| SpinupError::Config(format!("invalid spinup url {:?}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SpinupError::Config(format!(
                "unsupported url scheme: {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            http: SpinupHttpClient::new()?,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Validate the configured token, if any
    pub fn validate_token(&self) -> Result<()> {
        match &self.token {
            Some(t) => auth::validate_token(t),
            None => Ok(()),
        }
    }

    /// Log into CAS so later requests carry the session cookie
    pub async fn login(&self, cas_url: &str, username: &str, password: &str) -> Result<()> {
        let service = format!("{}/login", self.base_url);
        auth::cas_login(&self.http, cas_url, username, password, &service).await
    }

    /// Absolute URL for `T` addressed by `params`
    pub fn url_for<T: Endpoint>(&self, params: &Params) -> Result<String> {
        Ok(format!("{}{}{}", self.base_url, API_PREFIX, T::path(params)?))
    }

    /// GET and decode a typed entity
    pub async fn get<T>(&self, params: &Params) -> Result<T>
    where
        T: Endpoint + DeserializeOwned,
    {
        let url = self.url_for::<T>(params)?;
        tracing::info!("getting resource from endpoint: {}", url);
        let value = self.http.get(&url, self.token.as_deref()).await?;
        serde_json::from_value(value)
            .map_err(|e| SpinupError::decode(short_type_name::<T>(), e))
    }

    /// PUT a body to the endpoint of `T`; the raw response is returned
    pub async fn put<T, B>(&self, params: &Params, body: &B) -> Result<Value>
    where
        T: Endpoint,
        B: Serialize + ?Sized,
    {
        let url = self.url_for::<T>(params)?;
        tracing::info!("putting resource to endpoint: {}", url);
        self.http.put(&url, self.token.as_deref(), body).await
    }

    /// Resources of a space, each annotated with the space it was listed from
    pub async fn resources(&self, space: &str) -> Result<Vec<Resource>> {
        let detail: SpaceDetail = self.get(&Params::new().with("id", space)).await?;
        let mut resources = detail.into_resources();
        for r in resources.iter_mut() {
            r.space = space.to_string();
        }
        tracing::debug!("space {} has {} resources", space, resources.len());
        Ok(resources)
    }

    pub async fn size(&self, id: i64) -> Result<BaseSize> {
        self.get(&Params::new().with("id", id.to_string())).await
    }

    /// A container or server size with derived cpu/memory
    pub async fn compute_size(&self, id: i64) -> Result<ComputeSize> {
        ComputeSize::from_base(self.size(id).await?)
    }

    /// Every secret in a space, with ARNs
    pub async fn secrets(&self, space: &str) -> Result<Vec<Secret>> {
        let names: SecretNames = self.get(&Params::new().with("space", space)).await?;
        let mut secrets = Vec::with_capacity(names.0.len());
        for name in names.0 {
            let params = Params::new().with("space", space).with("secret", name);
            secrets.push(self.get::<Secret>(&params).await?);
        }
        Ok(secrets)
    }
}

fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spinup::container::ContainerService;

    #[test]
    fn test_new_trims_trailing_slash() {
        let c = SpinupClient::new("https://spinup.example.edu/", None).unwrap();
        assert_eq!(c.base_url(), "https://spinup.example.edu");
        assert!(!c.has_token());
    }

    #[test]
    fn test_new_rejects_bad_urls() {
        assert!(SpinupClient::new("not a url", None).is_err());
        assert!(SpinupClient::new("ftp://example.edu", None).is_err());
    }

    #[test]
    fn test_url_for() {
        let c = SpinupClient::new("https://spinup.example.edu", Some(String::new())).unwrap();
        assert!(!c.has_token());
        assert_eq!(
            c.url_for::<ContainerService>(&Params::resource("teamA", "web")).unwrap(),
            "https://spinup.example.edu/api/v3/spaces/teamA/containers/web"
        );
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<ContainerService>(), "ContainerService");
    }
}
