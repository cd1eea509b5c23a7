//! Container service wire model
//!
//! Mirrors the ECS-shaped documents the backend returns for container
//! resources. Field names are PascalCase on the wire.

use super::endpoint::{space_path, Endpoint, Params};
use super::flex;
use crate::error::{Result, SpinupError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name/Value pair (environment variables, attachment details, tags)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameValue {
    #[serde(default, alias = "name")]
    pub name: String,
    #[serde(default, alias = "value")]
    pub value: String,
}

/// Name/ValueFrom pair; `value_from` is normally a secrets-manager ARN
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameValueFrom {
    #[serde(default, alias = "name")]
    pub name: String,
    #[serde(default, alias = "valueFrom")]
    pub value_from: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapacityProviderStrategyItem {
    #[serde(default)]
    pub base: i64,
    #[serde(default)]
    pub capacity_provider: String,
    #[serde(default)]
    pub weight: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerEvent {
    #[serde(default)]
    pub created_at: String,
    #[serde(rename = "Id", alias = "ID", default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(default, alias = "Command", deserialize_with = "flex::nullable")]
    pub command: Vec<String>,
    #[serde(default, alias = "Interval")]
    pub interval: i64,
    #[serde(default, alias = "Retries")]
    pub retries: i64,
    #[serde(rename = "startperiod", alias = "StartPeriod", default)]
    pub start_period: i64,
    #[serde(default, alias = "Timeout")]
    pub timeout: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MountPoint {
    #[serde(rename = "containerpath", alias = "ContainerPath", default)]
    pub container_path: String,
    #[serde(rename = "readonly", alias = "ReadOnly", default)]
    pub read_only: bool,
    #[serde(rename = "sourcevolume", alias = "SourceVolume", default)]
    pub source_volume: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PortMapping {
    #[serde(default)]
    pub container_port: i64,
    #[serde(default)]
    pub host_port: i64,
    #[serde(default)]
    pub protocol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositoryCredentials {
    #[serde(default)]
    pub credentials_parameter: String,
}

/// A container definition. Fields the CLI does not interpret are carried in
/// `extra` so a definition can be sent back unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub environment: Vec<NameValue>,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub secrets: Vec<NameValueFrom>,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub port_mappings: Vec<PortMapping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub mount_points: Vec<MountPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_credentials: Option<RepositoryCredentials>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContainerDefinition {
    /// True when the image is pulled with registry credentials
    pub fn uses_registry_auth(&self) -> bool {
        self.repository_credentials
            .as_ref()
            .is_some_and(|c| !c.credentials_parameter.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EfsVolumeConfiguration {
    #[serde(default)]
    pub file_system_id: String,
    #[serde(default)]
    pub root_directory: String,
    #[serde(default)]
    pub transit_encryption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerVolume {
    #[serde(default)]
    pub name: String,
    /// Presence (even `{}`) marks a task-local volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub efs_volume_configuration: Option<EfsVolumeConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskDefinition {
    #[serde(default, deserialize_with = "flex::nullable")]
    pub compatibilities: Vec<String>,
    #[serde(rename = "Cpu", alias = "CPU", default, deserialize_with = "flex::text")]
    pub cpu: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub container_definitions: Vec<ContainerDefinition>,
    #[serde(default)]
    pub family: String,
    #[serde(default, deserialize_with = "flex::text")]
    pub memory: String,
    #[serde(default)]
    pub revision: i64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub task_definition_arn: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub volumes: Vec<ContainerVolume>,
}

/// A container service with its current task definition
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerService {
    #[serde(default, deserialize_with = "flex::nullable")]
    pub capacity_provider_strategy: Vec<CapacityProviderStrategyItem>,
    #[serde(default)]
    pub cluster_arn: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub desired_count: i64,
    #[serde(default)]
    pub pending_count: i64,
    #[serde(default)]
    pub running_count: i64,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub events: Vec<ContainerEvent>,
    #[serde(default)]
    pub service_arn: String,
    #[serde(default)]
    pub service_endpoint: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub status: String,
    /// Running task ARNs
    #[serde(default, deserialize_with = "flex::nullable")]
    pub tasks: Vec<String>,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub task_definition: TaskDefinition,
}

impl ContainerService {
    /// True when any capacity provider places tasks on spot capacity
    pub fn is_spot(&self) -> bool {
        self.capacity_provider_strategy
            .iter()
            .any(|c| c.capacity_provider == "FARGATE_SPOT")
    }
}

impl Endpoint for ContainerService {
    fn path(params: &Params) -> Result<String> {
        space_path(params, "containers")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskAttachment {
    #[serde(default, deserialize_with = "flex::nullable")]
    pub details: Vec<NameValue>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskContainer {
    #[serde(default)]
    pub container_arn: String,
    #[serde(default, deserialize_with = "flex::text")]
    pub exit_code: String,
    #[serde(default)]
    pub health_status: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub last_status: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub attachments: Vec<TaskAttachment>,
    #[serde(default)]
    pub capacity_provider_name: String,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub containers: Vec<TaskContainer>,
    #[serde(default, deserialize_with = "flex::text")]
    pub cpu: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub desired_status: String,
    #[serde(default)]
    pub health_status: String,
    #[serde(default)]
    pub last_status: String,
    #[serde(default)]
    pub launch_type: String,
    #[serde(default, deserialize_with = "flex::text")]
    pub memory: String,
    #[serde(default)]
    pub platform_version: String,
    #[serde(default)]
    pub pull_started_at: String,
    #[serde(default)]
    pub pull_stopped_at: String,
    #[serde(default)]
    pub stop_code: String,
    #[serde(default)]
    pub stopped_at: String,
    #[serde(default)]
    pub stopped_reason: String,
    #[serde(default)]
    pub stopping_at: String,
    #[serde(default)]
    pub task_arn: String,
    #[serde(default)]
    pub version: i64,
}

impl Task {
    /// Private IPv4 address of the task's elastic network interface
    pub fn private_ip(&self) -> Option<&str> {
        self.attachments
            .iter()
            .filter(|a| a.kind == "ElasticNetworkInterface")
            .flat_map(|a| a.details.iter())
            .filter(|d| d.name == "privateIPv4Address")
            .map(|d| d.value.as_str())
            .last()
    }
}

/// Response for a single task lookup
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerTask {
    #[serde(default, deserialize_with = "flex::nullable")]
    pub failures: Vec<Value>,
    #[serde(default, deserialize_with = "flex::nullable")]
    pub tasks: Vec<Task>,
}

impl Endpoint for ContainerTask {
    fn path(params: &Params) -> Result<String> {
        let task = params.get("task")?;
        if task.is_empty() {
            return Err(SpinupError::input("empty parameter: task"));
        }
        let task: Vec<_> = task
            .split('/')
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        Ok(format!("{}/tasks/{}", space_path(params, "containers")?, task.join("/")))
    }
}

/// Task id as addressed by the backend: everything after the first `/` of the ARN
pub fn task_id(arn: &str) -> &str {
    arn.split_once('/').map(|(_, id)| id).unwrap_or(arn)
}

/// Body for a redeploy with the current configuration
#[derive(Debug, Clone, Serialize)]
pub struct RedeployInput {
    pub only_redeploy: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceUpdateInput {
    pub capacity_provider_strategy: Vec<CapacityProviderStrategyItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub container_definitions: Vec<ContainerDefinition>,
    pub desired_count: i64,
    pub platform_version: String,
}

/// Body for a scale or image update
#[derive(Debug, Clone, Serialize)]
pub struct ContainerServiceUpdate {
    pub force_redeploy: bool,
    pub service: ServiceUpdateInput,
    pub size_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_service_decode_with_nulls() {
        let svc: ContainerService = serde_json::from_value(json!({
            "Status": "ACTIVE",
            "DesiredCount": 2,
            "Events": null,
            "Tasks": null,
            "CapacityProviderStrategy": [
                {"Base": 1, "CapacityProvider": "FARGATE_SPOT", "Weight": 1}
            ],
            "TaskDefinition": {
                "Cpu": "256",
                "ContainerDefinitions": [{
                    "Name": "web",
                    "Image": "nginx:1.25",
                    "Environment": null,
                    "Essential": true,
                    "HealthCheck": {"Command": ["CMD", "true"], "Interval": 30}
                }]
            }
        }))
        .unwrap();

        assert_eq!(svc.status, "ACTIVE");
        assert!(svc.is_spot());
        assert!(svc.events.is_empty());
        let cdef = &svc.task_definition.container_definitions[0];
        assert_eq!(cdef.health_check.as_ref().unwrap().interval, 30);
        assert_eq!(cdef.extra.get("Essential"), Some(&json!(true)));
        assert!(!cdef.uses_registry_auth());
    }

    #[test]
    fn test_container_definition_round_trips_unknown_fields() {
        let raw = json!({"Name": "web", "Image": "nginx:1", "Ulimits": [{"Name": "nofile"}]});
        let cdef: ContainerDefinition = serde_json::from_value(raw).unwrap();
        let out = serde_json::to_value(&cdef).unwrap();
        assert_eq!(out["Ulimits"][0]["Name"], "nofile");
        assert_eq!(out["Image"], "nginx:1");
    }

    #[test]
    fn test_private_ip() {
        let task: Task = serde_json::from_value(json!({
            "Attachments": [
                {"Type": "Other", "Details": [{"Name": "privateIPv4Address", "Value": "1.1.1.1"}]},
                {"Type": "ElasticNetworkInterface", "Details": [
                    {"Name": "subnetId", "Value": "subnet-1"},
                    {"Name": "privateIPv4Address", "Value": "10.0.0.5"}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(task.private_ip(), Some("10.0.0.5"));
    }

    #[test]
    fn test_task_endpoint() {
        let params = Params::resource("teamA", "web").with("task", "cluster-1/abc123");
        assert_eq!(
            ContainerTask::path(&params).unwrap(),
            "/spaces/teamA/containers/web/tasks/cluster-1/abc123"
        );
    }

    #[test]
    fn test_task_id() {
        assert_eq!(
            task_id("arn:aws:ecs:us-east-1:1:task/cluster-1/abc123"),
            "cluster-1/abc123"
        );
        assert_eq!(task_id("abc123"), "abc123");
    }
}
