//! Single-resource lookups by ID or by `mine`.

use crate::cache::{Cache, Cached, key};
use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::resource::{ListResponse, Resource};
use crate::transport::{Query, Transport};
use eyre::Context;
use tracing::instrument;

/// Fetches one `kind` resource, either by `id` or (with `mine`) the caller's own.
///
/// An explicit `id` takes precedence over `mine`. Validation happens before the cache or the
/// network is consulted.
#[instrument(skip(transport, cache), ret)]
pub async fn get_item<T: Transport>(
    transport: &T,
    cache: &Cache,
    kind: ResourceKind,
    mine: bool,
    id: Option<&str>,
) -> Result<Resource> {
    if !mine && id.is_none() {
        return Err(Error::validation(
            "Items must either specify an ID or the 'mine' parameter.",
        ));
    }
    if mine && !kind.supports_mine() {
        return Err(Error::validation(format!(
            "{} cannot be filtered by the 'mine' parameter.",
            kind.endpoint()
        )));
    }

    let cache_key = key::item(kind, id);
    if let Some(Cached::Item(item)) = cache.get(&cache_key).await {
        return Ok(item);
    }

    let mut query: Query = Vec::with_capacity(3);
    match id {
        Some(id) => query.push(("id", id.to_string())),
        None => query.push(("mine", "true".to_string())),
    }
    query.push(("fields", kind.fields().to_string()));
    query.push(("part", kind.request_part()));

    let response = transport.api(kind.endpoint(), &query).await?;
    let response: ListResponse = serde_json::from_value(response)
        .with_context(|| format!("parse YouTube {} response", kind.endpoint()))?;

    tracing::debug!(
        endpoint = kind.endpoint(),
        returned_items = response.items.len(),
        "fetched item"
    );

    let Some(item) = response.items.into_iter().next() else {
        return Err(Error::not_found("Item not found"));
    };
    let resource = Resource::from_item(kind, item, None)?;

    cache.set(cache_key, Cached::Item(resource.clone())).await;
    Ok(resource)
}
