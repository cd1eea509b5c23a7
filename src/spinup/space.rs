//! Spaces and their cost

use super::endpoint::{Endpoint, Params};
use super::flex;
use super::resource::Resource;
use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataType {
    #[serde(default, alias = "Id", deserialize_with = "flex::int")]
    pub id: i64,
    #[serde(default, alias = "Name")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Space {
    #[serde(default, deserialize_with = "flex::int")]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub owner: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub department: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub contact: String,
    #[serde(rename = "questid", default, skip_serializing_if = "String::is_empty")]
    pub questionnaire_id: String,
    #[serde(rename = "sg", default, skip_serializing_if = "String::is_empty")]
    pub security_group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub security: String,
    #[serde(default, deserialize_with = "flex::nullable", skip_serializing_if = "Vec::is_empty")]
    pub data_types: Vec<DataType>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deleted_at: String,
    #[serde(default, deserialize_with = "flex::boolean")]
    pub mine: bool,
    #[serde(default, deserialize_with = "flex::nullable", skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<SpaceCost>,
}

/// Space detail response; the resource list may sit at the top level or
/// inside the space object depending on backend version
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpaceDetail {
    #[serde(default)]
    pub space: Option<Space>,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub resources: Vec<Resource>,
}

impl SpaceDetail {
    pub fn into_resources(self) -> Vec<Resource> {
        if !self.resources.is_empty() {
            return self.resources;
        }
        self.space.map(|s| s.resources).unwrap_or_default()
    }
}

impl Endpoint for SpaceDetail {
    fn path(params: &Params) -> Result<String> {
        Ok(format!("/spaces/{}", params.segment("id")?))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Spaces {
    #[serde(default, deserialize_with = "flex::nullable")]
    pub spaces: Vec<Space>,
}

impl Endpoint for Spaces {
    fn path(_params: &Params) -> Result<String> {
        Ok("/spaces".to_string())
    }
}

/// Cost estimate for a space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SpaceCost {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl Endpoint for SpaceCost {
    fn path(params: &Params) -> Result<String> {
        Ok(format!("/spaces/{}/cost", params.segment("id")?))
    }
}
