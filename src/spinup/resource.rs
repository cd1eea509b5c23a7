//! Resource envelope and offering

use super::endpoint::{space_path, Endpoint, Params};
use super::flex;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// An offering ("type") a resource was provisioned from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    #[serde(default, deserialize_with = "flex::int")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub security: String,
    #[serde(default, deserialize_with = "flex::boolean")]
    pub beta: bool,
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub details: String,
}

/// A managed object in a space - container service, server, database, bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "flex::int")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub is_a: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub admin: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server_id: String,
    #[serde(default, deserialize_with = "flex::int")]
    pub size_id: i64,
    #[serde(default, deserialize_with = "flex::int")]
    pub space_id: i64,
    #[serde(default, deserialize_with = "flex::int")]
    pub type_id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub offering: Option<Offering>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub task: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub deleted_at: String,
    /// Owning space as addressed by the caller; filled in after fetch
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub space: String,
}

impl Resource {
    /// Offering, or an empty one when the backend omitted it
    pub fn offering(&self) -> Offering {
        self.offering.clone().unwrap_or_default()
    }

    /// Kind tag used for dispatch: `is_a`, falling back to the offering type
    pub fn kind_tag(&self) -> &str {
        if !self.is_a.is_empty() {
            return &self.is_a;
        }
        self.offering
            .as_ref()
            .map(|o| o.category.as_str())
            .unwrap_or("")
    }

    /// Flavor from the offering, falling back to the envelope
    pub fn flavor(&self) -> &str {
        match self.offering.as_ref() {
            Some(o) if !o.flavor.is_empty() => &o.flavor,
            _ => &self.flavor,
        }
    }
}

impl Endpoint for Resource {
    fn path(params: &Params) -> Result<String> {
        space_path(params, "resources")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_flexible_ids() {
        let r: Resource = serde_json::from_value(json!({
            "id": "17",
            "name": "web",
            "status": "created",
            "is_a": "container",
            "size_id": 3,
            "space_id": "9",
            "type": {"id": 1, "name": "Container", "flavor": "fargate", "security": "low", "beta": "1"}
        }))
        .unwrap();

        assert_eq!(r.id, 17);
        assert_eq!(r.size_id, 3);
        assert_eq!(r.space_id, 9);
        assert!(r.offering().beta);
        assert_eq!(r.kind_tag(), "container");
        assert_eq!(r.flavor(), "fargate");
    }

    #[test]
    fn test_kind_tag_falls_back_to_offering_type() {
        let r: Resource = serde_json::from_value(json!({
            "name": "bucket",
            "type": {"flavor": "s3", "type": "storage"}
        }))
        .unwrap();
        assert_eq!(r.kind_tag(), "storage");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            Resource::path(&Params::resource("teamA", "web")).unwrap(),
            "/spaces/teamA/resources/web"
        );
    }
}
