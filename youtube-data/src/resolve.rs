//! Turning loosely-specified input (an ID, a URL, or search terms) into a canonical ID.

use crate::cache::{Cache, Cached, key};
use crate::error::Result;
use crate::kind::ResourceKind;
use crate::transport::Transport;
use crate::{search, url_parser};
use serde_json::Value;
use tracing::instrument;

/// Every canonical channel ID starts with this.
pub const CHANNEL_ID_PREFIX: &str = "UC";

/// Length of a canonical video ID.
pub const VIDEO_ID_LEN: usize = 11;

/// Resolves `input` to the ID of a `kind` resource.
///
/// Tries, in order: a previous resolution of the same input, a cached item whose ID *is* the
/// input, IDs embedded in a YouTube URL, and finally a search for the first matching resource.
/// When none of those produce an ID, the input is returned verbatim and any resulting miss
/// surfaces from the subsequent fetch instead.
#[instrument(skip(transport, cache), ret)]
pub async fn resolve_id<T: Transport>(
    transport: &T,
    cache: &Cache,
    input: &str,
    kind: ResourceKind,
) -> Result<String> {
    let id_key = key::resolved_id(kind, input);
    if let Some(Cached::Id(id)) = cache.get(&id_key).await {
        return Ok(id);
    }
    if let Some(Cached::Item(item)) = cache.get(&key::item(kind, Some(input))).await {
        return Ok(item.id().to_string());
    }

    let mut id = None;
    let mut named_by_url = false;

    if url_parser::looks_like_url(input) {
        let parsed = url_parser::parse(input);
        match parsed.get(kind) {
            // custom URLs and handles name the channel but are not its ID
            Some(name) if kind == ResourceKind::Channel && !name.starts_with(CHANNEL_ID_PREFIX) => {
                named_by_url = true;
                id = search_first(transport, name, kind).await?;
            }
            Some(from_url) => id = Some(from_url.to_string()),
            None => {}
        }
    }

    // a custom channel URL has already been searched by name
    if id.is_none() && !named_by_url && should_search(input, kind) {
        id = search_first(transport, input, kind).await?;
    }

    let id = id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| input.to_string());
    cache.set(id_key, Cached::Id(id.clone())).await;
    Ok(id)
}

/// Whether `input` is unlikely to already be a `kind` ID.
fn should_search(input: &str, kind: ResourceKind) -> bool {
    let has_whitespace = input.chars().any(char::is_whitespace);
    match kind {
        ResourceKind::Channel => !input.starts_with(CHANNEL_ID_PREFIX) || has_whitespace,
        ResourceKind::Playlist => has_whitespace,
        ResourceKind::Video => input.chars().count() < VIDEO_ID_LEN || has_whitespace,
        _ => false,
    }
}

/// ID of the first search hit of type `kind` for `term`, if any.
async fn search_first<T: Transport>(
    transport: &T,
    term: &str,
    kind: ResourceKind,
) -> Result<Option<String>> {
    let Some(id_field) = kind.search_id_field() else {
        return Ok(None);
    };

    let hits = search::search_hits(transport, kind, term, "id", 1).await?;
    let hit = hits
        .first()
        .and_then(|item| item.get("id"))
        .and_then(|id| id.get(id_field))
        .and_then(Value::as_str)
        .map(str::to_string);

    tracing::debug!(%kind, term, ?hit, "resolved search hit");
    Ok(hit)
}
