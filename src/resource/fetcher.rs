//! Resource Fetcher
//!
//! Retrieves the generic resource envelope for a resolved address.

use super::resolver::ResourceRef;
use crate::error::Result;
use crate::spinup::resource::Resource;
use crate::spinup::{Params, SpinupClient};

/// Fetch the envelope at `target`; the result remembers the space it was addressed by
pub async fn fetch(client: &SpinupClient, target: &ResourceRef) -> Result<Resource> {
    let mut resource: Resource = client
        .get(&Params::resource(&target.space, &target.name))
        .await?;
    resource.space = target.space.clone();

    tracing::debug!(
        "fetched {} (id {}, status {}, kind {})",
        target,
        resource.id,
        resource.status,
        resource.kind_tag()
    );
    Ok(resource)
}
