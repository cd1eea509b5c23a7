//! Container service projections

use super::secrets::{map_name_values, map_secrets};
use super::summary::{new_summary, to_json, Detailed};
use crate::error::Result;
use crate::spinup::container::{
    task_id, ContainerDefinition, ContainerEvent, ContainerService, ContainerTask, ContainerVolume,
    HealthCheck, MountPoint, Task,
};
use crate::spinup::resource::Resource;
use crate::spinup::secret::Secret;
use crate::spinup::{Params, SpinupClient};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerView {
    pub auth: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<HealthCheck>,
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mountpoints: Vec<MountPoint>,
    pub name: String,
    #[serde(rename = "portMappings", skip_serializing_if = "Vec::is_empty")]
    pub port_mappings: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub secrets: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeView {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nfs_volume: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerDetails {
    pub containers: Vec<ContainerView>,
    pub desired_count: i64,
    pub endpoint: String,
    pub pending_count: i64,
    pub running_count: i64,
    pub spot: bool,
    pub volumes: Vec<VolumeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub created_at: String,
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContainerView {
    pub exit_code: String,
    pub health_status: String,
    pub image: String,
    pub last_status: String,
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub availability_zone: String,
    pub capacity_provider: String,
    pub cpu: String,
    pub created_at: String,
    pub id: String,
    pub ip_address: String,
    pub last_status: String,
    pub launch_type: String,
    pub memory: String,
    pub platform_version: String,
    pub pull_started_at: String,
    pub pull_stopped_at: String,
    pub stop_code: String,
    pub stopped_at: String,
    pub stopped_reason: String,
    pub stopping_at: String,
    pub containers: Vec<TaskContainerView>,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventsView {
    pub events: Vec<EventView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasksView {
    pub tasks: Vec<TaskView>,
}

fn params(resource: &Resource) -> Params {
    Params::resource(&resource.space, &resource.name)
}

async fn service(client: &SpinupClient, resource: &Resource) -> Result<ContainerService> {
    let info: ContainerService = client.get(&params(resource)).await?;
    tracing::debug!(
        "container service {} status {} with {} definitions",
        resource.name,
        info.status,
        info.task_definition.container_definitions.len()
    );
    Ok(info)
}

pub async fn summary(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let size = client.compute_size(resource.size_id).await?;
    let info = service(client, resource).await?;
    to_json(&new_summary(resource, &size, &info.status))
}

pub async fn details(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let size = client.compute_size(resource.size_id).await?;
    let info = service(client, resource).await?;

    let defs = &info.task_definition.container_definitions;
    let secrets = if defs.iter().any(|d| !d.secrets.is_empty()) {
        client.secrets(&resource.space).await?
    } else {
        Vec::new()
    };

    let out = Detailed {
        summary: new_summary(resource, &size, &info.status),
        details: container_details(&info, &secrets)?,
    };
    to_json(&out)
}

/// Detail view of a service given the space's secrets
pub fn container_details(info: &ContainerService, secrets: &[Secret]) -> Result<ContainerDetails> {
    let containers = info
        .task_definition
        .container_definitions
        .iter()
        .map(|d| container_view(d, secrets))
        .collect::<Result<Vec<_>>>()?;

    Ok(ContainerDetails {
        containers,
        desired_count: info.desired_count,
        endpoint: info.service_endpoint.clone(),
        pending_count: info.pending_count,
        running_count: info.running_count,
        spot: info.is_spot(),
        volumes: info.task_definition.volumes.iter().map(volume_view).collect(),
    })
}

fn container_view(def: &ContainerDefinition, secrets: &[Secret]) -> Result<ContainerView> {
    Ok(ContainerView {
        auth: def.uses_registry_auth(),
        env: map_name_values(&def.environment)?,
        healthcheck: def.health_check.clone(),
        image: def.image.clone(),
        mountpoints: def.mount_points.clone(),
        name: def.name.clone(),
        port_mappings: def
            .port_mappings
            .iter()
            .map(|p| format!("{}/{}", p.container_port, p.protocol))
            .collect(),
        secrets: map_secrets(&def.secrets, secrets)?,
    })
}

fn volume_view(volume: &ContainerVolume) -> VolumeView {
    VolumeView {
        name: volume.name.clone(),
        kind: if volume.host.is_some() {
            "ephemeral"
        } else {
            "persistent"
        },
        nfs_volume: volume
            .efs_volume_configuration
            .as_ref()
            .map(|e| e.file_system_id.clone())
            .unwrap_or_default(),
    }
}

/// Service events, newest first
pub async fn events(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let info = service(client, resource).await?;
    to_json(&EventsView {
        events: event_views(&info.events),
    })
}

fn event_views(events: &[ContainerEvent]) -> Vec<EventView> {
    events
        .iter()
        .rev()
        .map(|e| EventView {
            created_at: e.created_at.clone(),
            id: e.id.clone(),
            message: e.message.clone(),
        })
        .collect()
}

/// Running tasks, one lookup per task
pub async fn tasks(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let info = service(client, resource).await?;

    let mut views = Vec::with_capacity(info.tasks.len());
    for arn in &info.tasks {
        let id = task_id(arn);
        let out: ContainerTask = client.get(&params(resource).with("task", id)).await?;
        views.extend(out.tasks.iter().map(|t| task_view(id, t)));
    }

    to_json(&TasksView { tasks: views })
}

fn task_view(id: &str, task: &Task) -> TaskView {
    TaskView {
        availability_zone: task.availability_zone.clone(),
        capacity_provider: task.capacity_provider_name.clone(),
        cpu: task.cpu.clone(),
        created_at: task.created_at.clone(),
        id: id.to_string(),
        ip_address: task.private_ip().unwrap_or_default().to_string(),
        last_status: task.last_status.clone(),
        launch_type: task.launch_type.clone(),
        memory: task.memory.clone(),
        platform_version: task.platform_version.clone(),
        pull_started_at: task.pull_started_at.clone(),
        pull_stopped_at: task.pull_stopped_at.clone(),
        stop_code: task.stop_code.clone(),
        stopped_at: task.stopped_at.clone(),
        stopped_reason: task.stopped_reason.clone(),
        stopping_at: task.stopping_at.clone(),
        containers: task
            .containers
            .iter()
            .map(|c| TaskContainerView {
                exit_code: c.exit_code.clone(),
                health_status: c.health_status.clone(),
                image: c.image.clone(),
                last_status: c.last_status.clone(),
                name: c.name.clone(),
                reason: c.reason.clone(),
            })
            .collect(),
        version: task.version,
    }
}
