//! Common summary shape shared by every resource kind

use crate::error::{Result, SpinupError};
use crate::spinup::resource::Resource;
use crate::spinup::size::Size;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSummary {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "type")]
    pub offering: String,
    pub flavor: String,
    pub security: String,
    pub beta: bool,
    pub size: String,
    pub tryit: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub state: String,
}

/// Summary of `resource` at `size`; `state` is the kind-specific live state
pub fn new_summary(resource: &Resource, size: &dyn Size, state: &str) -> ResourceSummary {
    let offering = resource.offering();
    ResourceSummary {
        id: resource.id.to_string(),
        ip: resource.ip.clone(),
        name: resource.name.clone(),
        status: resource.status.clone(),
        offering: offering.name,
        flavor: resource.flavor().to_string(),
        security: offering.security,
        beta: offering.beta,
        size: size.name().to_string(),
        tryit: size.is_tryit(),
        state: state.to_string(),
    }
}

/// A summary with a `details` object attached
#[derive(Debug, Serialize)]
pub struct Detailed<D: Serialize> {
    #[serde(flatten)]
    pub summary: ResourceSummary,
    pub details: D,
}

pub fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| SpinupError::decode("output", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spinup::size::BaseSize;
    use serde_json::json;

    fn resource() -> Resource {
        serde_json::from_value(json!({
            "id": 42,
            "name": "bucket",
            "status": "created",
            "is_a": "storage",
            "type": {"name": "Storage", "flavor": "s3", "security": "low", "beta": "0"}
        }))
        .unwrap()
    }

    #[test]
    fn test_summary_fields() {
        let size = BaseSize {
            name: "trial".to_string(),
            price: "tryit".to_string(),
            ..Default::default()
        };
        let out = to_json(&new_summary(&resource(), &size, "empty")).unwrap();
        assert_eq!(
            out,
            json!({
                "id": "42",
                "name": "bucket",
                "status": "created",
                "type": "Storage",
                "flavor": "s3",
                "security": "low",
                "beta": false,
                "size": "trial",
                "tryit": true,
                "state": "empty"
            })
        );
    }

    #[test]
    fn test_detailed_flattens_summary() {
        let size = BaseSize::default();
        let d = Detailed {
            summary: new_summary(&resource(), &size, ""),
            details: json!({"empty": true}),
        };
        let out = to_json(&d).unwrap();
        assert_eq!(out["name"], "bucket");
        assert_eq!(out["details"]["empty"], true);
        assert!(out.get("state").is_none());
        assert_eq!(out["tryit"], false);
    }
}
