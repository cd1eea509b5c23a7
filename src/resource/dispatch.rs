//! Kind Dispatch
//!
//! Routes a fetched resource to the projector for its kind. Kind-specific
//! backend endpoints only exist for live resources, so every path goes
//! through the lifecycle gate first.

use super::summary::to_json;
use super::{container, database, server, storage};
use crate::error::{Result, SpinupError};
use crate::spinup::resource::Resource;
use crate::spinup::SpinupClient;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Lifecycle states with kind-specific detail behind them
pub const LIVE_STATES: [&str; 3] = ["created", "creating", "deleting"];

pub fn is_live(status: &str) -> bool {
    LIVE_STATES.contains(&status)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Container,
    Database,
    Server,
    Storage,
}

impl Kind {
    /// Kind of a resource from its type tag
    pub fn of(resource: &Resource) -> Result<Kind> {
        match resource.kind_tag() {
            "container" => Ok(Kind::Container),
            "db" | "database" => Ok(Kind::Database),
            "server" => Ok(Kind::Server),
            "storage" => Ok(Kind::Storage),
            other => Err(SpinupError::UnsupportedKind(if other.is_empty() {
                format!("resource {} has no type tag", resource.name)
            } else {
                other.to_string()
            })),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Container => "container",
            Kind::Database => "database",
            Kind::Server => "server",
            Kind::Storage => "storage",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which view of a resource to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Summary,
    Details,
    /// Container service events
    Events,
    /// Container running tasks
    Tasks,
}

/// Minimal view of a resource that is not live
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub id: String,
    pub name: String,
    pub status: String,
    pub space_id: String,
}

impl StatusView {
    pub fn of(resource: &Resource) -> Self {
        Self {
            id: resource.id.to_string(),
            name: resource.name.clone(),
            status: resource.status.clone(),
            space_id: resource.space_id.to_string(),
        }
    }
}

/// Fail unless `resource` is of the `expected` kind
pub fn expect_kind(resource: &Resource, expected: Kind) -> Result<()> {
    let actual = Kind::of(resource)?;
    if actual != expected {
        return Err(SpinupError::input(format!(
            "{} is a {} resource, not a {}",
            resource.name, actual, expected
        )));
    }
    Ok(())
}

/// Render `projection` of `resource`.
pub async fn project(
    client: &SpinupClient,
    resource: &Resource,
    projection: Projection,
) -> Result<Value> {
    if !is_live(&resource.status) {
        tracing::info!(
            "{} is {}, skipping {} lookup",
            resource.name,
            resource.status,
            resource.kind_tag()
        );
        return to_json(&StatusView::of(resource));
    }

    let kind = Kind::of(resource)?;
    tracing::debug!("dispatching {} as {} ({:?})", resource.name, kind, projection);

    match (kind, projection) {
        (Kind::Container, Projection::Summary) => container::summary(client, resource).await,
        (Kind::Container, Projection::Details) => container::details(client, resource).await,
        (Kind::Container, Projection::Events) => container::events(client, resource).await,
        (Kind::Container, Projection::Tasks) => container::tasks(client, resource).await,
        (Kind::Database, Projection::Summary) => database::summary(client, resource).await,
        (Kind::Database, Projection::Details) => database::details(client, resource).await,
        (Kind::Server, Projection::Summary) => server::summary(client, resource).await,
        (Kind::Server, Projection::Details) => server::details(client, resource).await,
        (Kind::Storage, Projection::Summary) => storage::summary(client, resource).await,
        (Kind::Storage, Projection::Details) => storage::details(client, resource).await,
        (kind, projection) => Err(SpinupError::input(format!(
            "{:?} is only available for container resources, not {}",
            projection, kind
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(v: Value) -> Resource {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_kind_from_tag() {
        let cases = [
            ("container", Kind::Container),
            ("db", Kind::Database),
            ("database", Kind::Database),
            ("server", Kind::Server),
            ("storage", Kind::Storage),
        ];
        for (tag, kind) in cases {
            assert_eq!(Kind::of(&resource(json!({"is_a": tag}))).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = Kind::of(&resource(json!({"is_a": "queue"}))).unwrap_err();
        assert!(matches!(err, SpinupError::UnsupportedKind(_)));
        assert!(Kind::of(&resource(json!({"name": "x"}))).is_err());
    }

    #[test]
    fn test_lifecycle_gate() {
        assert!(is_live("created"));
        assert!(is_live("creating"));
        assert!(is_live("deleting"));
        assert!(!is_live("failed"));
        assert!(!is_live("pending_delete"));
        assert!(!is_live(""));
    }

    #[test]
    fn test_status_view_shape() {
        let r = resource(json!({"id": 7, "name": "web", "status": "failed", "space_id": "3"}));
        assert_eq!(
            to_json(&StatusView::of(&r)).unwrap(),
            json!({"id": "7", "name": "web", "status": "failed", "space_id": "3"})
        );
    }

    #[test]
    fn test_expect_kind() {
        let r = resource(json!({"name": "web", "is_a": "container"}));
        assert!(expect_kind(&r, Kind::Container).is_ok());
        assert!(expect_kind(&r, Kind::Server).unwrap_err().is_input());
    }
}
