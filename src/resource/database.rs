//! Database projections
//!
//! A database is backed by a cluster (serverless or provisioned), a single
//! instance, or, for shared databases, nothing but a `host:port` endpoint.

use super::summary::{new_summary, to_json, Detailed, ResourceSummary};
use crate::error::{Result, SpinupError};
use crate::spinup::database::{DBCluster, DBInstance, DatabaseInfo};
use crate::spinup::resource::Resource;
use crate::spinup::size::BaseSize;
use crate::spinup::{Params, SpinupClient};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DbDetails {
    pub auto_minor_version_upgrade: bool,
    pub created_at: String,
    pub engine: String,
    pub engine_version: String,
    pub master_username: String,
    pub backup_retention_period: i64,
    pub backup_window: String,
    pub maintenance_window: String,
    pub port: i64,
    pub endpoint: String,
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DatabaseDetails {
    #[serde(rename_all = "camelCase")]
    Serverless {
        #[serde(flatten)]
        common: DbDetails,
        auto_pause_enabled: bool,
        earliest_restorable_time: String,
        engine_mode: String,
        latest_restorable_time: String,
        current_capacity: i64,
        max_capacity: i64,
        min_capacity: i64,
        seconds_to_auto_pause: i64,
    },
    #[serde(rename_all = "camelCase")]
    Provisioned {
        #[serde(flatten)]
        common: DbDetails,
        earliest_restorable_time: String,
        engine_mode: String,
        latest_restorable_time: String,
        size: String,
    },
    #[serde(rename_all = "camelCase")]
    Instance {
        #[serde(flatten)]
        common: DbDetails,
        allocated_storage: i64,
        #[serde(rename = "multiAZ")]
        multi_az: bool,
        size: String,
    },
    #[serde(rename_all = "camelCase")]
    Shared {
        endpoint: String,
        port: i64,
        master_username: String,
    },
}

/// Live status: the cluster's (paused when a serverless cluster sits at zero
/// capacity), else the instance's, else the resource's own
pub fn resolve_status(resource: &Resource, info: &DatabaseInfo) -> String {
    if let Some(cluster) = info.cluster() {
        return cluster.effective_status().to_string();
    }
    if let Some(instance) = info.instance() {
        return instance.status.clone();
    }
    resource.status.clone()
}

fn cluster_common(cluster: &DBCluster) -> DbDetails {
    DbDetails {
        auto_minor_version_upgrade: cluster.auto_minor_version_upgrade,
        created_at: cluster.cluster_create_time.clone(),
        engine: cluster.engine.clone(),
        engine_version: cluster.engine_version.clone(),
        master_username: cluster.master_username.clone(),
        backup_retention_period: cluster.backup_retention_period,
        backup_window: cluster.preferred_backup_window.clone(),
        maintenance_window: cluster.preferred_maintenance_window.clone(),
        port: cluster.port,
        endpoint: cluster.endpoint.clone(),
        encrypted: cluster.storage_encrypted,
    }
}

fn instance_common(instance: &DBInstance) -> DbDetails {
    let endpoint = instance.endpoint.clone().unwrap_or_default();
    DbDetails {
        auto_minor_version_upgrade: instance.auto_minor_version_upgrade,
        created_at: instance.instance_create_time.clone(),
        engine: instance.engine.clone(),
        engine_version: instance.engine_version.clone(),
        master_username: instance.master_username.clone(),
        backup_retention_period: instance.backup_retention_period,
        backup_window: instance.preferred_backup_window.clone(),
        maintenance_window: instance.preferred_maintenance_window.clone(),
        port: endpoint.port,
        endpoint: endpoint.address,
        encrypted: instance.storage_encrypted,
    }
}

/// Split a shared database endpoint `host[:port]`
fn split_endpoint(endpoint: &str) -> Result<(String, i64)> {
    match endpoint.split_once(':') {
        None => Ok((endpoint.to_string(), 0)),
        Some((host, port)) => {
            let port = port.parse::<i64>().map_err(|e| {
                SpinupError::decode("database endpoint", format!("failed to parse {} as int: {}", port, e))
            })?;
            Ok((host.to_string(), port))
        }
    }
}

pub fn database_details(
    resource: &Resource,
    size: &BaseSize,
    info: &DatabaseInfo,
) -> Result<DatabaseDetails> {
    if let Some(cluster) = info.cluster() {
        let common = cluster_common(cluster);
        if cluster.is_serverless() {
            let scaling = cluster.scaling_configuration_info.clone().unwrap_or_default();
            return Ok(DatabaseDetails::Serverless {
                common,
                auto_pause_enabled: scaling.auto_pause,
                earliest_restorable_time: cluster.earliest_restorable_time.clone(),
                engine_mode: cluster.engine_mode.clone(),
                latest_restorable_time: cluster.latest_restorable_time.clone(),
                current_capacity: cluster.capacity,
                max_capacity: scaling.max_capacity,
                min_capacity: scaling.min_capacity,
                seconds_to_auto_pause: scaling.seconds_until_auto_pause,
            });
        }

        let size = match info.instance() {
            Some(instance) => instance.class.clone(),
            None => size.name.clone(),
        };
        return Ok(DatabaseDetails::Provisioned {
            common,
            earliest_restorable_time: cluster.earliest_restorable_time.clone(),
            engine_mode: cluster.engine_mode.clone(),
            latest_restorable_time: cluster.latest_restorable_time.clone(),
            size,
        });
    }

    if let Some(instance) = info.instance() {
        return Ok(DatabaseDetails::Instance {
            common: instance_common(instance),
            allocated_storage: instance.allocated_storage,
            multi_az: instance.multi_az,
            size: instance.class.clone(),
        });
    }

    tracing::debug!("{} has no cluster or instance, treating as shared", resource.name);
    let (endpoint, port) = split_endpoint(&info.endpoint)?;
    Ok(DatabaseDetails::Shared {
        endpoint,
        port,
        master_username: resource.name.clone(),
    })
}

async fn info(client: &SpinupClient, resource: &Resource) -> Result<DatabaseInfo> {
    client
        .get(&Params::resource(&resource.space, &resource.name))
        .await
}

/// Summary with both `status` and `state` set to the resolved live status
fn summary_for(resource: &Resource, size: &BaseSize, info: &DatabaseInfo) -> ResourceSummary {
    let status = resolve_status(resource, info);
    let mut summary = new_summary(resource, size, &status);
    summary.status = status;
    summary
}

pub async fn summary(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let size = client.size(resource.size_id).await?;
    let info = info(client, resource).await?;
    to_json(&summary_for(resource, &size, &info))
}

pub async fn details(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let size = client.size(resource.size_id).await?;
    let info = info(client, resource).await?;
    let out = Detailed {
        summary: summary_for(resource, &size, &info),
        details: database_details(resource, &size, &info)?,
    };
    to_json(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource() -> Resource {
        serde_json::from_value(json!({
            "id": 5, "name": "shareddb", "status": "created", "is_a": "database"
        }))
        .unwrap()
    }

    fn info(v: Value) -> DatabaseInfo {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_paused_serverless_in_summary_and_details() {
        let info = info(json!({"DBClusters": [{
            "EngineMode": "serverless", "Capacity": 0, "Status": "available",
            "ScalingConfigurationInfo": {"AutoPause": true, "MaxCapacity": 8, "MinCapacity": 2}
        }]}));
        let size = BaseSize::default();
        let summary = to_json(&summary_for(&resource(), &size, &info)).unwrap();
        assert_eq!(summary["status"], "paused");
        assert_eq!(summary["state"], "paused");

        let details = to_json(&database_details(&resource(), &size, &info).unwrap()).unwrap();
        assert_eq!(details["autoPauseEnabled"], true);
        assert_eq!(details["maxCapacity"], 8);
        assert_eq!(details["currentCapacity"], 0);
    }

    #[test]
    fn test_provisioned_size_prefers_instance_class() {
        let info = info(json!({
            "DBClusters": [{"EngineMode": "provisioned", "Status": "available", "Port": 3306}],
            "DBInstances": [{"DBInstanceClass": "db.r5.large"}]
        }));
        let size = BaseSize {
            name: "medium".to_string(),
            ..Default::default()
        };
        let details = to_json(&database_details(&resource(), &size, &info).unwrap()).unwrap();
        assert_eq!(details["size"], "db.r5.large");
        assert_eq!(details["port"], 3306);
        assert_eq!(resolve_status(&resource(), &info), "available");
    }

    #[test]
    fn test_instance_branch() {
        let info = info(json!({"DBInstances": [{
            "DBInstanceClass": "db.t3.micro",
            "DBInstanceStatus": "backing-up",
            "AllocatedStorage": 20,
            "MultiAZ": true,
            "Endpoint": {"Address": "pg.example.edu", "Port": 5432}
        }]}));
        let details =
            to_json(&database_details(&resource(), &BaseSize::default(), &info).unwrap()).unwrap();
        assert_eq!(details["endpoint"], "pg.example.edu");
        assert_eq!(details["port"], 5432);
        assert_eq!(details["multiAZ"], true);
        assert_eq!(details["allocatedStorage"], 20);
        assert_eq!(resolve_status(&resource(), &info), "backing-up");
    }

    #[test]
    fn test_shared_fallback() {
        let info = info(json!({"Endpoint": "mysql.example.edu:3306"}));
        let details =
            to_json(&database_details(&resource(), &BaseSize::default(), &info).unwrap()).unwrap();
        assert_eq!(
            details,
            json!({"endpoint": "mysql.example.edu", "port": 3306, "masterUsername": "shareddb"})
        );
        assert_eq!(resolve_status(&resource(), &info), "created");
    }

    #[test]
    fn test_shared_bad_port() {
        let info = info(json!({"Endpoint": "mysql.example.edu:abc"}));
        assert!(database_details(&resource(), &BaseSize::default(), &info).is_err());
    }
}
