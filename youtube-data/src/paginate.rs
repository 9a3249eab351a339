//! Following multi-page listings.

use crate::cache::{Cache, Cached, key};
use crate::error::{Error, Result};
use crate::kind::ListEndpoint;
use crate::resource::{ListResponse, Resource};
use crate::transport::{Query, Transport};
use eyre::Context;
use serde_json::Value;
use tracing::instrument;

/// Lower bound on the number of page requests a single listing may make.
///
/// The actual bound is raised to the page count the first response reports, so this only
/// limits listings whose reported totals are missing or understated.
pub const MIN_PAGE_REQUESTS: usize = 3;

/// Lists `endpoint` for `id` (or for the caller, with `mine`).
///
/// A non-positive `max_results` fetches every page; a positive one returns at most that many
/// top-level items from the first page. Comment threads come back as top-level comments with
/// their replies attached, and replies do not count towards `max_results`.
#[instrument(skip(transport, cache))]
pub async fn get_paginated_items<T: Transport>(
    transport: &T,
    cache: &Cache,
    endpoint: ListEndpoint,
    mine: bool,
    id: Option<&str>,
    max_results: i64,
) -> Result<Vec<Resource>> {
    if !mine && id.is_none() && endpoint.requires_id() {
        return Err(Error::validation(format!(
            "{endpoint} must either specify an ID or the 'mine' parameter."
        )));
    }
    if mine && !endpoint.supports_mine() {
        return Err(Error::validation(format!(
            "{endpoint} cannot be filtered by the 'mine' parameter."
        )));
    }
    let ceiling = endpoint.max_page_size();
    if let Some(max) = ceiling.filter(|&max| max_results > i64::from(max)) {
        return Err(Error::validation(format!(
            "Max results must be {max} or below for {}",
            endpoint.api_endpoint()
        )));
    }

    // `mine` wins over an ID in the request, so it must in the key too.
    let cache_key = key::listing(endpoint, if mine { None } else { id }, max_results);
    if let Some(Cached::Items(items)) = cache.get(&cache_key).await {
        return Ok(items);
    }

    let fetch_all = max_results <= 0;
    let query = list_query(endpoint, mine, id, max_results);

    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut stop_after_page = !fetch_all;
    let mut page_limit = MIN_PAGE_REQUESTS;
    let mut page = 0;

    loop {
        page += 1;
        let mut page_query = query.clone();
        if let Some(token) = page_token.take() {
            page_query.push(("pageToken", token));
        }

        let response = transport.api(endpoint.api_endpoint(), &page_query).await?;
        let response: ListResponse = serde_json::from_value(response)
            .with_context(|| format!("parse YouTube {} response", endpoint.api_endpoint()))?;

        tracing::debug!(
            %endpoint,
            page,
            returned_items = response.items.len(),
            total_results = ?response.page_info.and_then(|p| p.total_results),
            "fetched page"
        );

        if response.items.is_empty() {
            if page == 1 {
                return Err(Error::not_found(format!(
                    "{} not found",
                    endpoint.api_endpoint()
                )));
            }
            break;
        }

        // The page count is estimated once, from the first page. Listings that report a single
        // page or no totals at all are never followed further.
        if page == 1 {
            match response.page_info.and_then(|p| p.page_estimate()) {
                Some(pages) if pages > 1.0 => {
                    page_limit = page_limit.max(pages.ceil() as usize);
                }
                _ => stop_after_page = true,
            }
        }

        for item in response.items {
            items.push(to_resource(endpoint, item)?);
        }

        match response.next_page_token {
            Some(token) if !stop_after_page && page < page_limit => page_token = Some(token),
            _ => break,
        }
    }

    if !fetch_all {
        items.truncate(usize::try_from(max_results).unwrap_or(usize::MAX));
    }

    tracing::debug!(%endpoint, pages = page, items = items.len(), "finished listing");
    cache.set(cache_key, Cached::Items(items.clone())).await;
    Ok(items)
}

fn list_query(endpoint: ListEndpoint, mine: bool, id: Option<&str>, max_results: i64) -> Query {
    let mut query: Query = vec![("part", endpoint.part().to_string())];

    if let Some(param) = endpoint.id_param() {
        if mine {
            query.push(("mine", "true".to_string()));
        } else if let Some(id) = id {
            query.push((param, id.to_string()));
        }
    }
    if endpoint.is_comment_thread() {
        query.push(("textFormat", "plainText".to_string()));
    }
    if let Some(max) = endpoint.max_page_size() {
        let per_page = if max_results <= 0 {
            i64::from(max)
        } else {
            max_results
        };
        query.push(("maxResults", per_page.to_string()));
    }

    query
}

fn to_resource(endpoint: ListEndpoint, item: Value) -> eyre::Result<Resource> {
    let is_thread = item
        .get("snippet")
        .and_then(|s| s.get("topLevelComment"))
        .is_some();
    if is_thread {
        Resource::from_thread(item, endpoint.comment_kind())
    } else {
        Resource::from_item(endpoint.item_kind(), item, endpoint.comment_kind())
    }
}
