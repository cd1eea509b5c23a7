//! Space secrets

use super::endpoint::{Endpoint, Params};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Secret metadata; the value itself is never returned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Secret {
    #[serde(rename = "ARN", default)]
    pub arn: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_id: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(default)]
    pub last_modified_date: String,
    #[serde(default)]
    pub version: i64,
}

impl Endpoint for Secret {
    fn path(params: &Params) -> Result<String> {
        Ok(format!(
            "/spaces/{}/secrets/{}",
            params.segment("space")?,
            params.segment("secret")?
        ))
    }
}

/// Names of the secrets in a space
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SecretNames(pub Vec<String>);

impl Endpoint for SecretNames {
    fn path(params: &Params) -> Result<String> {
        Ok(format!("/spaces/{}/secrets", params.segment("space")?))
    }
}
