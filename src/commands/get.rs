//! `get` commands

use super::{list, Session};
use crate::error::Result;
use crate::resource::dispatch::{self, Kind, Projection};
use crate::resource::{fetch, resolve, summary::to_json};
use crate::spinup::space::{Space, SpaceCost, SpaceDetail};
use crate::spinup::Params;
use serde_json::Value;

/// Resolve `token`, check a live resource is of `kind` and render `projection` of it
pub async fn resource(
    session: &Session,
    kind: Kind,
    token: &str,
    projection: Projection,
) -> Result<Value> {
    let target = resolve(&session.client, token, session.default_spaces()).await?;
    tracing::info!("get {} {} ({:?})", kind, target, projection);

    let resource = fetch(&session.client, &target).await?;
    // Resources that are not live render the status view whatever their tag
    if dispatch::is_live(&resource.status) {
        dispatch::expect_kind(&resource, kind)?;
    }
    dispatch::project(&session.client, &resource, projection).await
}

/// Space detail, with the cost estimate attached when `cost` is set
pub async fn space(session: &Session, space: &str, cost: bool) -> Result<Value> {
    let params = Params::new().with("id", space);
    let detail: SpaceDetail = session.client.get(&params).await?;

    let top_level = detail.resources;
    let mut out: Space = detail.space.unwrap_or_default();
    if out.resources.is_empty() {
        out.resources = top_level;
    }

    if cost {
        out.cost = Some(session.client.get::<SpaceCost>(&params).await?);
    }
    to_json(&out)
}

pub async fn secrets(session: &Session, space: Option<String>) -> Result<Value> {
    let spaces = session.spaces_or_default(&space.into_iter().collect::<Vec<_>>())?;
    list::secrets(session, &spaces).await
}

pub async fn images(session: &Session, space: Option<String>) -> Result<Value> {
    let spaces = session.spaces_or_default(&space.into_iter().collect::<Vec<_>>())?;
    list::images(session, &spaces).await
}
