//! `update container`
//!
//! Three mutually exclusive updates, in precedence order: a new image tag for
//! one container, a new task count, or a plain redeploy.

use super::Session;
use crate::error::{Result, SpinupError};
use crate::resource::dispatch::{self, Kind};
use crate::resource::{fetch, resolve};
use crate::spinup::container::{
    CapacityProviderStrategyItem, ContainerService, ContainerServiceUpdate, RedeployInput,
    ServiceUpdateInput,
};
use crate::spinup::resource::Resource;
use crate::spinup::Params;

const PLATFORM_VERSION: &str = "LATEST";

/// Flags of `update container`
#[derive(Debug, Clone, Default)]
pub struct ContainerUpdate {
    pub redeploy: bool,
    pub scale: Option<i64>,
    pub container: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Retag { container: String, tag: String },
    Scale(i64),
    Redeploy,
}

impl ContainerUpdate {
    fn action(&self) -> Result<Action> {
        match (&self.container, &self.tag) {
            (Some(container), Some(tag)) => {
                return Ok(Action::Retag {
                    container: container.clone(),
                    tag: tag.clone(),
                })
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(SpinupError::input(
                    "both --container and --tag must be specified to update the container image",
                ))
            }
            (None, None) => {}
        }

        if let Some(scale) = self.scale {
            if scale < 0 {
                return Err(SpinupError::input(format!("invalid scale: {}", scale)));
            }
            return Ok(Action::Scale(scale));
        }
        if self.redeploy {
            return Ok(Action::Redeploy);
        }
        Err(SpinupError::input(
            "nothing to update; pass --redeploy, --scale or --container with --tag",
        ))
    }
}

/// Replace the tag of `image` (`repo[:port]/path:tag`)
pub fn retag(image: &str, tag: &str) -> Result<String> {
    let name_start = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[name_start..].rfind(':') {
        Some(i) => Ok(format!("{}:{}", &image[..name_start + i], tag)),
        None => Err(SpinupError::input(format!(
            "image {} has no tag, expected repository:tag",
            image
        ))),
    }
}

fn default_strategy() -> Vec<CapacityProviderStrategyItem> {
    vec![CapacityProviderStrategyItem {
        base: 1,
        capacity_provider: "FARGATE_SPOT".to_string(),
        weight: 1,
    }]
}

fn strategy_of(service: &ContainerService) -> Vec<CapacityProviderStrategyItem> {
    if service.capacity_provider_strategy.is_empty() {
        default_strategy()
    } else {
        service.capacity_provider_strategy.clone()
    }
}

/// Body for a scale to `count` tasks
pub fn scale_input(
    resource: &Resource,
    service: &ContainerService,
    count: i64,
    force_redeploy: bool,
) -> ContainerServiceUpdate {
    ContainerServiceUpdate {
        force_redeploy,
        size_id: resource.size_id,
        service: ServiceUpdateInput {
            capacity_provider_strategy: strategy_of(service),
            container_definitions: Vec::new(),
            desired_count: count,
            platform_version: PLATFORM_VERSION.to_string(),
        },
    }
}

/// Body for a new image tag on `container`; the rest of the service is resent unchanged
pub fn retag_input(
    resource: &Resource,
    service: &ContainerService,
    container: &str,
    tag: &str,
    force_redeploy: bool,
) -> Result<ContainerServiceUpdate> {
    let mut definitions = service.task_definition.container_definitions.clone();
    let def = definitions
        .iter_mut()
        .find(|d| d.name == container)
        .ok_or_else(|| {
            SpinupError::input(format!(
                "container with name {} not found in task definition",
                container
            ))
        })?;
    def.image = retag(&def.image, tag)?;
    tracing::debug!("container {} image is now {}", container, def.image);

    Ok(ContainerServiceUpdate {
        force_redeploy,
        size_id: resource.size_id,
        service: ServiceUpdateInput {
            capacity_provider_strategy: strategy_of(service),
            container_definitions: definitions,
            desired_count: service.desired_count,
            platform_version: PLATFORM_VERSION.to_string(),
        },
    })
}

/// Apply `update` to the container service named by `token`
pub async fn container(session: &Session, token: &str, update: &ContainerUpdate) -> Result<()> {
    let action = update.action()?;

    let target = resolve(&session.client, token, session.default_spaces()).await?;
    let resource = fetch(&session.client, &target).await?;
    dispatch::expect_kind(&resource, Kind::Container)?;
    if resource.status != "created" {
        return Err(SpinupError::input(format!(
            "cannot update {}: resource is {}",
            target, resource.status
        )));
    }

    let client = &session.client;
    let params = Params::resource(&target.space, &target.name);
    match action {
        Action::Redeploy => {
            tracing::info!("redeploying {}", target);
            client
                .put::<ContainerService, _>(&params, &RedeployInput { only_redeploy: true })
                .await?;
        }
        Action::Scale(count) => {
            tracing::info!("scaling {} to {}", target, count);
            let service: ContainerService = client.get(&params).await?;
            let input = scale_input(&resource, &service, count, update.redeploy);
            client.put::<ContainerService, _>(&params, &input).await?;
        }
        Action::Retag { container, tag } => {
            tracing::info!("updating container {} of {} to tag {}", container, target, tag);
            let service: ContainerService = client.get(&params).await?;
            let input = retag_input(&resource, &service, &container, &tag, update.redeploy)?;
            client.put::<ContainerService, _>(&params, &input).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update(container: Option<&str>, tag: Option<&str>, scale: Option<i64>, redeploy: bool) -> ContainerUpdate {
        ContainerUpdate {
            redeploy,
            scale,
            container: container.map(String::from),
            tag: tag.map(String::from),
        }
    }

    #[test]
    fn test_action_precedence() {
        assert_eq!(
            update(Some("web"), Some("v2"), Some(3), true).action().unwrap(),
            Action::Retag {
                container: "web".to_string(),
                tag: "v2".to_string()
            }
        );
        assert_eq!(update(None, None, Some(3), true).action().unwrap(), Action::Scale(3));
        assert_eq!(update(None, None, None, true).action().unwrap(), Action::Redeploy);
    }

    #[test]
    fn test_action_input_errors() {
        assert!(update(Some("web"), None, None, true).action().unwrap_err().is_input());
        assert!(update(None, Some("v2"), None, false).action().unwrap_err().is_input());
        assert!(update(None, None, None, false).action().unwrap_err().is_input());
        assert!(update(None, None, Some(-1), false).action().unwrap_err().is_input());
    }

    #[test]
    fn test_retag() {
        assert_eq!(retag("nginx:1.25", "1.27").unwrap(), "nginx:1.27");
        assert_eq!(
            retag("registry.example.edu:5000/team/app:abc", "def").unwrap(),
            "registry.example.edu:5000/team/app:def"
        );
        assert!(retag("registry.example.edu:5000/team/app", "def").is_err());
        assert!(retag("nginx", "1").is_err());
    }

    fn service() -> ContainerService {
        serde_json::from_value(json!({
            "DesiredCount": 2,
            "TaskDefinition": {"ContainerDefinitions": [
                {"Name": "web", "Image": "nginx:1.25", "Essential": true},
                {"Name": "sidecar", "Image": "envoy:v1"}
            ]}
        }))
        .unwrap()
    }

    #[test]
    fn test_scale_input_defaults_strategy() {
        let resource = Resource {
            size_id: 12,
            ..Default::default()
        };
        let body = serde_json::to_value(scale_input(&resource, &service(), 4, false)).unwrap();
        assert_eq!(
            body,
            json!({
                "force_redeploy": false,
                "size_id": 12,
                "service": {
                    "CapacityProviderStrategy": [{"Base": 1, "CapacityProvider": "FARGATE_SPOT", "Weight": 1}],
                    "DesiredCount": 4,
                    "PlatformVersion": "LATEST"
                }
            })
        );
    }

    #[test]
    fn test_retag_input_keeps_other_containers() {
        let body = retag_input(&Resource::default(), &service(), "web", "1.27", false).unwrap();
        assert!(!body.force_redeploy);
        assert_eq!(body.service.desired_count, 2);
        let defs = serde_json::to_value(&body.service.container_definitions).unwrap();
        assert_eq!(defs[0]["Image"], "nginx:1.27");
        assert_eq!(defs[0]["Essential"], true);
        assert_eq!(defs[1]["Image"], "envoy:v1");
    }

    #[test]
    fn test_retag_input_unknown_container() {
        let err = retag_input(&Resource::default(), &service(), "db", "1", true).unwrap_err();
        assert!(err.is_input());
    }
}
