//! Server images

use super::endpoint::{Endpoint, Params};
use super::flex;
use super::resource::Offering;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageVolume {
    #[serde(default)]
    pub delete_on_termination: bool,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(rename = "snapshot_id", default)]
    pub id: String,
    #[serde(rename = "volume_size", default)]
    pub size: i64,
    #[serde(rename = "volume_type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub architecture: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(default, deserialize_with = "flex::nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, ImageVolume>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offering: Option<Offering>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Images(pub Vec<Image>);

impl Endpoint for Images {
    fn path(params: &Params) -> Result<String> {
        Ok(format!("/spaces/{}/images", params.segment("space")?))
    }
}
