//! Storage projections
//!
//! Only S3 buckets have a detail endpoint; other flavors are rejected.

use super::summary::{new_summary, to_json, ResourceSummary};
use crate::error::{Result, SpinupError};
use crate::spinup::resource::Resource;
use crate::spinup::storage::{S3StorageInfo, S3StorageUser, S3StorageUsers};
use crate::spinup::{Params, SpinupClient};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub username: String,
    pub created_at: String,
    pub last_used: String,
    pub key_id: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StorageDetails {
    #[serde(flatten)]
    pub summary: ResourceSummary,
    pub empty: bool,
    pub users: Vec<UserView>,
}

fn require_s3(resource: &Resource) -> Result<()> {
    match resource.flavor() {
        "s3" | "s3bucket" => Ok(()),
        "efs" => Err(SpinupError::UnsupportedKind(
            "storage flavor efs is not supported yet".to_string(),
        )),
        other => Err(SpinupError::UnsupportedKind(format!(
            "unknown storage flavor: {}",
            other
        ))),
    }
}

fn params(resource: &Resource) -> Params {
    Params::resource(&resource.space, &resource.name)
}

pub async fn summary(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    require_s3(resource)?;
    let size = client.size(resource.size_id).await?;
    let info: S3StorageInfo = client.get(&params(resource)).await?;
    to_json(&new_summary(resource, &size, info.state()))
}

pub async fn details(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    require_s3(resource)?;
    let size = client.size(resource.size_id).await?;
    let info: S3StorageInfo = client.get(&params(resource)).await?;
    let listed: S3StorageUsers = client.get(&params(resource)).await?;

    let mut users = Vec::with_capacity(listed.0.len());
    for u in &listed.0 {
        let detail: S3StorageUser = client
            .get(&params(resource).with("user", u.user_name.as_str()))
            .await?;
        users.push(user_view(u, &detail));
    }

    to_json(&StorageDetails {
        summary: new_summary(resource, &size, info.state()),
        empty: info.empty,
        users,
    })
}

/// Listing entry plus the key ids from its detail lookup
fn user_view(listed: &S3StorageUser, detail: &S3StorageUser) -> UserView {
    UserView {
        username: listed.user_name.clone(),
        created_at: listed.create_date.clone(),
        last_used: listed.password_last_used.clone(),
        key_id: detail
            .access_keys
            .iter()
            .map(|k| k.access_key_id.clone())
            .collect(),
    }
}
