//! Endpoint resolution
//!
//! Every backend entity knows how to build its own path from a set of named
//! parameters. The client takes the entity type as a parameter and never
//! hard-codes URLs itself.

use crate::error::{Result, SpinupError};
use std::collections::BTreeMap;

/// API version prefix every endpoint lives under
pub const API_PREFIX: &str = "/api/v3";

/// Named path parameters (`space`, `name`, `id`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<&'static str, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters addressing a resource inside a space
    pub fn resource(space: &str, name: &str) -> Self {
        Self::new().with("space", space).with("name", name)
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    /// Raw parameter value
    pub fn get(&self, key: &str) -> Result<&str> {
        self.0
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| SpinupError::input(format!("missing required parameter: {}", key)))
    }

    /// Parameter value percent-encoded for use as a single path segment
    pub fn segment(&self, key: &str) -> Result<String> {
        let value = self.get(key)?;
        if value.is_empty() {
            return Err(SpinupError::input(format!("empty parameter: {}", key)));
        }
        Ok(urlencoding::encode(value).into_owned())
    }
}

/// A backend entity with a resolvable endpoint
pub trait Endpoint {
    /// Path relative to the API root, e.g. `/spaces/abc/resources/web`
    fn path(params: &Params) -> Result<String>;
}

/// `/spaces/{space}/<collection>/{name}` - the shape most detail endpoints share
pub fn space_path(params: &Params, collection: &str) -> Result<String> {
    Ok(format!(
        "/spaces/{}/{}/{}",
        params.segment("space")?,
        collection,
        params.segment("name")?
    ))
}
