//! Scripted in-memory transport for exercising the kernel without a network.

use crate::transport::Transport;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// One request seen by [`FakeTransport`].
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub endpoint: String,
    pub query: Vec<(&'static str, String)>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Replays queued responses per endpoint and records every request.
///
/// A request to an endpoint with nothing queued fails, so unexpected network traffic shows up
/// as a test failure rather than a hang.
#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, String>>>>,
    calls: Mutex<Vec<Call>>,
    authorized: bool,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authorized() -> Self {
        Self {
            authorized: true,
            ..Self::default()
        }
    }

    /// Queues `body` as the next response from `endpoint`.
    pub fn respond(&self, endpoint: &str, body: Value) -> &Self {
        self.enqueue(endpoint, Ok(body))
    }

    /// Queues a transport failure as the next response from `endpoint`.
    pub fn fail(&self, endpoint: &str, message: &str) -> &Self {
        self.enqueue(endpoint, Err(message.to_string()))
    }

    fn enqueue(&self, endpoint: &str, response: Result<Value, String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.endpoint == endpoint)
            .collect()
    }
}

impl Transport for FakeTransport {
    async fn api(&self, endpoint: &str, query: &[(&'static str, String)]) -> eyre::Result<Value> {
        self.calls.lock().unwrap().push(Call {
            endpoint: endpoint.to_string(),
            query: query.to_vec(),
        });
        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Ok(body)) => Ok(body),
            Some(Err(message)) => Err(eyre::eyre!(message)),
            None => Err(eyre::eyre!("unexpected request to {endpoint}")),
        }
    }

    fn has_access_token(&self) -> bool {
        self.authorized
    }
}

/// A list response page in the shape the API returns.
pub(crate) fn page(items: Vec<Value>, total: Option<u32>, next: Option<&str>) -> Value {
    let mut body = serde_json::json!({ "items": items });
    if let Some(total) = total {
        body["pageInfo"] = serde_json::json!({ "totalResults": total, "resultsPerPage": 50 });
    }
    if let Some(next) = next {
        body["nextPageToken"] = Value::from(next);
    }
    body
}

/// A search response whose hits carry `ids` under `field` (`videoId`, `channelId`, ...).
pub(crate) fn search_hits(field: &str, ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "kind": "youtube#searchResult", "id": { field: id } }))
        .collect();
    serde_json::json!({ "items": items })
}
