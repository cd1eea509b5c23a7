//! `list` commands

use super::Session;
use crate::error::Result;
use crate::resource::summary::to_json;
use crate::spinup::image::{Image, Images};
use crate::spinup::resource::Resource;
use crate::spinup::space::{Space, SpaceCost, Spaces};
use crate::spinup::Params;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct SpaceListing {
    #[serde(flatten)]
    pub space: Space,
    pub resource_count: usize,
}

impl SpaceListing {
    fn new(mut space: Space) -> Self {
        let resource_count = space.resources.len();
        space.resources.clear();
        Self {
            space,
            resource_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecretListing {
    pub name: String,
    pub description: String,
    pub space: String,
}

#[derive(Debug, Serialize)]
pub struct ImageListing {
    #[serde(flatten)]
    pub image: Image,
    pub offering_name: String,
    pub space: String,
}

impl ImageListing {
    fn new(mut image: Image, space: &str) -> Self {
        let offering_name = image.offering.take().map(|o| o.name).unwrap_or_default();
        Self {
            image,
            offering_name,
            space: space.to_string(),
        }
    }
}

/// Every space visible to the caller
pub async fn spaces(session: &Session, cost: bool) -> Result<Value> {
    let listed: Spaces = session.client.get(&Params::new()).await?;
    tracing::info!("found {} spaces", listed.spaces.len());

    let mut out = Vec::with_capacity(listed.spaces.len());
    for mut space in listed.spaces {
        if cost {
            let params = Params::new().with("id", space.id.to_string());
            space.cost = Some(session.client.get::<SpaceCost>(&params).await?);
        } else {
            space.cost = None;
        }
        out.push(SpaceListing::new(space));
    }
    to_json(&out)
}

/// Resources of `spaces`; failed ones only when `show_failed` is set
pub async fn resources(session: &Session, spaces: &[String], show_failed: bool) -> Result<Value> {
    let spaces = session.spaces_or_default(spaces)?;
    let mut out: Vec<Resource> = Vec::new();
    for space in &spaces {
        let resources = session.client.resources(space).await?;
        out.extend(
            resources
                .into_iter()
                .filter(|r| show_failed || r.status != "failed"),
        );
    }
    to_json(&out)
}

pub async fn secrets(session: &Session, spaces: &[String]) -> Result<Value> {
    let spaces = session.spaces_or_default(spaces)?;
    let mut out = Vec::new();
    for space in &spaces {
        for secret in session.client.secrets(space).await? {
            out.push(SecretListing {
                name: secret.name,
                description: secret.description,
                space: space.clone(),
            });
        }
    }
    to_json(&out)
}

pub async fn images(session: &Session, spaces: &[String]) -> Result<Value> {
    let spaces = session.spaces_or_default(spaces)?;
    let mut out = Vec::new();
    for space in &spaces {
        let images: Images = session.client.get(&Params::new().with("space", space.as_str())).await?;
        out.extend(images.0.into_iter().map(|i| ImageListing::new(i, space)));
    }
    to_json(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_space_listing_drops_resources() {
        let space: Space = serde_json::from_value(json!({
            "id": 3, "name": "teamA", "resources": [{"name": "a"}, {"name": "b"}]
        }))
        .unwrap();
        let out = to_json(&SpaceListing::new(space)).unwrap();
        assert_eq!(out["resource_count"], 2);
        assert!(out.get("resources").is_none());
        assert!(out.get("cost").is_none());
    }

    #[test]
    fn test_image_listing_flattens_offering() {
        let image: Image = serde_json::from_value(json!({
            "id": "ami-1", "name": "base", "offering": {"id": 4, "name": "Linux Server"}
        }))
        .unwrap();
        let out = to_json(&ImageListing::new(image, "teamA")).unwrap();
        assert_eq!(out["offering_name"], "Linux Server");
        assert_eq!(out["space"], "teamA");
        assert!(out.get("offering").is_none());
    }
}
