//! Free-text search over videos, channels and playlists.

use crate::error::{Error, Result};
use crate::kind::ResourceKind;
use crate::resource::{ListResponse, Resource};
use crate::transport::{Query, Transport};
use eyre::Context;
use serde_json::Value;
use tracing::instrument;

/// Number of hits returned when the caller does not ask for a specific count.
pub const DEFAULT_SEARCH_RESULTS: u32 = 10;

/// Largest page the `search` endpoint serves.
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// Searches for `kind` resources matching `term`.
///
/// # Arguments
///
/// * `kind` - [`ResourceKind::Video`], [`ResourceKind::Channel`] or [`ResourceKind::Playlist`]
/// * `term` - Free-text search terms
/// * `max_results` - Number of hits to return, between 1 and [`MAX_SEARCH_RESULTS`];
///   `None` means [`DEFAULT_SEARCH_RESULTS`]
///
/// # Returns
///
/// The hits in the order the API ranked them, built into `kind` resources from the search
/// snippet. Search results are never cached.
#[instrument(skip(transport))]
pub async fn search<T: Transport>(
    transport: &T,
    kind: ResourceKind,
    term: &str,
    max_results: Option<u32>,
) -> Result<Vec<Resource>> {
    let max_results = max_results.unwrap_or(DEFAULT_SEARCH_RESULTS);
    if !(1..=MAX_SEARCH_RESULTS).contains(&max_results) {
        return Err(Error::validation(format!(
            "Max results must be greater than 0 and less than or equal to {MAX_SEARCH_RESULTS}"
        )));
    }
    if kind.search_type().is_none() {
        return Err(Error::validation(format!("{kind} cannot be searched")));
    }

    search_hits(transport, kind, term, "snippet", max_results)
        .await?
        .into_iter()
        .map(|hit| Resource::from_search_hit(kind, hit).map_err(Error::from))
        .collect()
}

/// Raw `searchResult` items for one search request.
pub(crate) async fn search_hits<T: Transport>(
    transport: &T,
    kind: ResourceKind,
    term: &str,
    part: &str,
    max_results: u32,
) -> Result<Vec<Value>> {
    let Some(search_type) = kind.search_type() else {
        return Ok(Vec::new());
    };

    let query: Query = vec![
        ("part", part.to_string()),
        ("type", search_type.to_string()),
        ("q", term.to_string()),
        ("maxResults", max_results.to_string()),
    ];
    let response = transport.api("search", &query).await?;
    let response: ListResponse =
        serde_json::from_value(response).context("parse YouTube search response")?;

    tracing::debug!(%kind, term, returned_items = response.items.len(), "searched");
    Ok(response.items)
}
