//! Server projections

use super::summary::{new_summary, to_json, Detailed};
use crate::error::Result;
use crate::spinup::resource::Resource;
use crate::spinup::server::{Disk, Disks, ServerInfo, Snapshot, Snapshots};
use crate::spinup::size::ServerSize;
use crate::spinup::{Params, SpinupClient};
use serde::Serialize;
use serde_json::Value;

/// Keys are PascalCase, as scripts consuming `get server -d` expect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceDetails {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Type")]
    pub instance_type: String,
    pub image: String,
    pub subnet: String,
    pub security_groups: Vec<String>,
    pub availability_zone: String,
    pub state: String,
}

/// A disk with the snapshots taken of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskView {
    #[serde(flatten)]
    pub disk: Disk,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub snapshots: Vec<Snapshot>,
}

#[derive(Debug, Serialize)]
pub struct ServerDetails {
    pub instance_details: InstanceDetails,
    pub disks: Vec<DiskView>,
    pub size: ServerSize,
}

fn params(resource: &Resource) -> Params {
    Params::resource(&resource.space, &resource.name)
}

pub async fn summary(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let size = client.compute_size(resource.size_id).await?;
    let info: ServerInfo = client.get(&params(resource)).await?;
    to_json(&new_summary(resource, &size, &info.state))
}

pub async fn details(client: &SpinupClient, resource: &Resource) -> Result<Value> {
    let size = client.compute_size(resource.size_id).await?;
    let info: ServerInfo = client.get(&params(resource)).await?;

    let p = params(resource);
    let (disks, snapshots) = futures::try_join!(
        client.get::<Disks>(&p),
        client.get::<Snapshots>(&p)
    )?;

    let out = Detailed {
        summary: new_summary(resource, &size, &info.state),
        details: ServerDetails {
            instance_details: instance_details(&info),
            disks: nest_snapshots(disks.0, &snapshots.0),
            size,
        },
    };
    to_json(&out)
}

fn instance_details(info: &ServerInfo) -> InstanceDetails {
    InstanceDetails {
        id: info.id.clone(),
        ip: info.ip.clone(),
        instance_type: info.instance_type.clone(),
        image: info.image.clone(),
        subnet: info.subnet.clone(),
        security_groups: info.security_group_names(),
        availability_zone: info.availability_zone.clone(),
        state: info.state.clone(),
    }
}

/// Attach each snapshot to the disk whose id matches its volume id, keeping disk order
pub fn nest_snapshots(disks: Vec<Disk>, snapshots: &[Snapshot]) -> Vec<DiskView> {
    disks
        .into_iter()
        .map(|disk| {
            let snapshots = snapshots
                .iter()
                .filter(|s| s.volume_id == disk.id)
                .cloned()
                .collect();
            DiskView { disk, snapshots }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nest_snapshots_by_volume_id() {
        let disks: Vec<Disk> = serde_json::from_value(json!([
            {"id": "vol-1", "size": 20},
            {"id": "vol-2", "size": "100"}
        ]))
        .unwrap();
        let snapshots: Vec<Snapshot> = serde_json::from_value(json!([
            {"id": "snap-a", "volume_id": "vol-2"},
            {"id": "snap-b", "volume_id": "vol-9"},
            {"id": "snap-c", "volume_id": "vol-2"}
        ]))
        .unwrap();

        let nested = nest_snapshots(disks, &snapshots);
        assert_eq!(nested.len(), 2);
        assert!(nested[0].snapshots.is_empty());
        let ids: Vec<&str> = nested[1].snapshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["snap-a", "snap-c"]);

        let out = to_json(&nested[0]).unwrap();
        assert_eq!(out["id"], "vol-1");
        assert_eq!(out["size"], 20);
        assert!(out.get("snapshots").is_none());
    }

    #[test]
    fn test_instance_details() {
        let info: ServerInfo = serde_json::from_value(json!({
            "id": "i-1", "ip": "10.0.0.1", "type": "t3.small", "az": "us-east-1a",
            "sgs": [{"sg-1": "web"}], "state": "running"
        }))
        .unwrap();
        let out = to_json(&instance_details(&info)).unwrap();
        assert_eq!(out["ID"], "i-1");
        assert_eq!(out["IP"], "10.0.0.1");
        assert_eq!(out["Type"], "t3.small");
        assert_eq!(out["AvailabilityZone"], "us-east-1a");
        assert_eq!(out["SecurityGroups"], json!(["sg-1"]));
    }
}
