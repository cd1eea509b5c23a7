//! Relational database wire model

use super::endpoint::{space_path, Endpoint, Params};
use super::flex;
use crate::error::Result;
use serde::Deserialize;

/// Database detail: a cluster, an instance, or just a bare `host:port`
/// endpoint for shared databases the backend does not manage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatabaseInfo {
    #[serde(rename = "Endpoint", default)]
    pub endpoint: String,
    #[serde(rename = "DBClusters", default, deserialize_with = "flex::nullable")]
    pub clusters: Vec<DBCluster>,
    #[serde(rename = "DBInstances", default, deserialize_with = "flex::nullable")]
    pub instances: Vec<DBInstance>,
}

impl DatabaseInfo {
    pub fn cluster(&self) -> Option<&DBCluster> {
        self.clusters.first()
    }

    pub fn instance(&self) -> Option<&DBInstance> {
        self.instances.first()
    }
}

impl Endpoint for DatabaseInfo {
    fn path(params: &Params) -> Result<String> {
        space_path(params, "databases")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DBCluster {
    #[serde(default)]
    pub allocated_storage: i64,
    #[serde(default)]
    pub auto_minor_version_upgrade: bool,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub backup_retention_period: i64,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub cluster_create_time: String,
    #[serde(rename = "DBClusterArn", default)]
    pub arn: String,
    #[serde(rename = "DBClusterIdentifier", default)]
    pub identifier: String,
    #[serde(default)]
    pub earliest_restorable_time: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub engine_mode: String,
    #[serde(default)]
    pub engine_version: String,
    #[serde(default)]
    pub latest_restorable_time: String,
    #[serde(default)]
    pub master_username: String,
    #[serde(rename = "MultiAZ", default)]
    pub multi_az: bool,
    #[serde(default)]
    pub port: i64,
    #[serde(default)]
    pub preferred_backup_window: String,
    #[serde(default)]
    pub preferred_maintenance_window: String,
    #[serde(default)]
    pub scaling_configuration_info: Option<DBScalingConfiguration>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub storage_encrypted: bool,
}

impl DBCluster {
    pub fn is_serverless(&self) -> bool {
        self.engine_mode == "serverless"
    }

    /// Cluster status, with a scaled-to-zero serverless cluster reported as paused
    pub fn effective_status(&self) -> &str {
        if self.is_serverless() && self.capacity == 0 {
            "paused"
        } else {
            &self.status
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DBScalingConfiguration {
    #[serde(default)]
    pub auto_pause: bool,
    #[serde(default)]
    pub max_capacity: i64,
    #[serde(default)]
    pub min_capacity: i64,
    #[serde(default)]
    pub seconds_until_auto_pause: i64,
    #[serde(default)]
    pub timeout_action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DBInstance {
    #[serde(default)]
    pub allocated_storage: i64,
    #[serde(default)]
    pub auto_minor_version_upgrade: bool,
    #[serde(default)]
    pub backup_retention_period: i64,
    #[serde(rename = "DBInstanceArn", default)]
    pub arn: String,
    #[serde(rename = "DBInstanceClass", default)]
    pub class: String,
    #[serde(rename = "DBInstanceIdentifier", default)]
    pub identifier: String,
    #[serde(rename = "DBInstanceStatus", default)]
    pub status: String,
    #[serde(rename = "DBName", default)]
    pub db_name: String,
    #[serde(default)]
    pub endpoint: Option<DBInstanceEndpoint>,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub engine_version: String,
    #[serde(default)]
    pub instance_create_time: String,
    #[serde(default)]
    pub latest_restorable_time: String,
    #[serde(default)]
    pub master_username: String,
    #[serde(rename = "MultiAZ", default)]
    pub multi_az: bool,
    #[serde(default)]
    pub preferred_backup_window: String,
    #[serde(default)]
    pub preferred_maintenance_window: String,
    #[serde(default)]
    pub publicly_accessible: bool,
    #[serde(default)]
    pub storage_encrypted: bool,
    #[serde(default)]
    pub storage_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DBInstanceEndpoint {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub hosted_zone_id: String,
    #[serde(default)]
    pub port: i64,
}
