//! Compute instance wire model

use super::endpoint::{Endpoint, Params};
use super::flex;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Live instance info as reported by the backend
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub instance_type: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub subnet: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub tags: Vec<BTreeMap<String, String>>,
    /// Each entry is a single `{group_id: group_name}` map
    #[serde(rename = "sgs", default, deserialize_with = "flex::nullable")]
    pub security_groups: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "az", default)]
    pub availability_zone: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub volumes: BTreeMap<String, DiskAttachment>,
}

impl ServerInfo {
    /// Security group keys flattened in listing order
    pub fn security_group_names(&self) -> Vec<String> {
        self.security_groups
            .iter()
            .flat_map(|m| m.keys().cloned())
            .collect()
    }
}

impl Endpoint for ServerInfo {
    fn path(params: &Params) -> Result<String> {
        Ok(format!(
            "/spaces/{}/resources/{}/info",
            params.segment("space")?,
            params.segment("name")?
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskAttachment {
    #[serde(default)]
    pub attach_time: String,
    #[serde(default)]
    pub delete_on_termination: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disk {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default, deserialize_with = "flex::int")]
    pub size: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<DiskAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Disks(pub Vec<Disk>);

impl Endpoint for Disks {
    fn path(params: &Params) -> Result<String> {
        Ok(format!(
            "/spaces/{}/servers/{}/disks",
            params.segment("space")?,
            params.segment("name")?
        ))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub progress: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub volume_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Snapshots(pub Vec<Snapshot>);

impl Endpoint for Snapshots {
    fn path(params: &Params) -> Result<String> {
        Ok(format!(
            "/spaces/{}/servers/{}/snapshots",
            params.segment("space")?,
            params.segment("name")?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_security_groups_flatten() {
        let info: ServerInfo = serde_json::from_value(json!({
            "id": "i-123",
            "state": "running",
            "sgs": [{"sg-1": "web"}, {"sg-2": "ssh"}],
            "volumes": null
        }))
        .unwrap();
        assert_eq!(info.security_group_names(), vec!["sg-1", "sg-2"]);
        assert!(info.volumes.is_empty());
    }

    #[test]
    fn test_endpoints() {
        let p = Params::resource("teamA", "box");
        assert_eq!(ServerInfo::path(&p).unwrap(), "/spaces/teamA/resources/box/info");
        assert_eq!(Disks::path(&p).unwrap(), "/spaces/teamA/servers/box/disks");
        assert_eq!(Snapshots::path(&p).unwrap(), "/spaces/teamA/servers/box/snapshots");
    }
}
