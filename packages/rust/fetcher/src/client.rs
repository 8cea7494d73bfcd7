//! HTTP client for the remote conversation platform.
//!
//! Three endpoints are used: `POST /conversations/search` (paginated range
//! queries over close timestamps), `GET /conversations/{id}` (single full
//! record), and `GET /teams` (team directory). All calls share one
//! [`RetryPolicy`].

use std::collections::{BTreeMap, HashSet};

use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use shiftscope_shared::{FetchConfig, ReportWindow, Result, ShiftscopeError};

use crate::record::{RawRecord, SearchResponse, TeamsResponse};
use crate::retry::{RetryClass, RetryPolicy};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("shiftscope/", env!("CARGO_PKG_VERSION"));

/// Outcome of a single-conversation fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Found(Box<RawRecord>),
    NotFound,
}

// ---------------------------------------------------------------------------
// SearchClient
// ---------------------------------------------------------------------------

/// Authenticated client over the conversation API.
pub struct SearchClient {
    http: Client,
    base: String,
    token: String,
    api_version: String,
    per_page: u32,
    retry: RetryPolicy,
}

impl SearchClient {
    /// Build a client from runtime fetch config and a bearer token.
    pub fn new(config: &FetchConfig, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| ShiftscopeError::fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            api_version: config.api_version.clone(),
            per_page: config.per_page,
            retry: RetryPolicy::new(config.max_attempts, config.retry_base),
        })
    }

    /// Fetch every conversation closed inside `window`, in page order.
    ///
    /// Pages are requested strictly sequentially; ids repeated across page
    /// boundaries are dropped. An empty result is not an error.
    #[instrument(skip_all, fields(start = %window.start_day, end = %window.end_day))]
    pub async fn search(&self, window: &ReportWindow) -> Result<Vec<RawRecord>> {
        let (start, end) = window.epoch_bounds();
        let mut records: Vec<RawRecord> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            pages += 1;
            let body = search_body(start, end, self.per_page, cursor.as_deref());
            let req = self
                .authed(self.http.post(format!("{}/conversations/search", self.base)))
                .json(&body);
            let resp = self.send_with_retry(req, "conversation search", false).await?;
            let parsed: SearchResponse = resp
                .json()
                .await
                .map_err(|e| ShiftscopeError::parse(format!("search response: {e}")))?;

            debug!(page = pages, count = parsed.conversations.len(), "search page received");

            for record in parsed.conversations {
                if let Some(id) = record.id.as_deref()
                    && !seen.insert(id.to_string())
                {
                    debug!(id, "duplicate id across pages, dropped");
                    continue;
                }
                records.push(record);
            }

            cursor = parsed
                .pages
                .and_then(|p| p.next)
                .and_then(|n| n.starting_after);
            if cursor.is_none() {
                break;
            }
        }

        info!(total = records.len(), pages, "search complete");
        Ok(records)
    }

    /// Fetch one conversation by id. A 404 is a [`FetchOutcome::NotFound`],
    /// not an error.
    #[instrument(skip_all, fields(id))]
    pub async fn fetch_one(&self, id: &str) -> Result<FetchOutcome> {
        let req = self.authed(self.http.get(format!("{}/conversations/{id}", self.base)));
        let resp = self.send_with_retry(req, "conversation fetch", true).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(FetchOutcome::NotFound);
        }

        let record: RawRecord = resp
            .json()
            .await
            .map_err(|e| ShiftscopeError::parse(format!("conversation {id}: {e}")))?;
        Ok(FetchOutcome::Found(Box::new(record)))
    }

    /// Fetch the team directory as an id → name map.
    pub async fn fetch_teams(&self) -> Result<BTreeMap<i64, String>> {
        let req = self.authed(self.http.get(format!("{}/teams", self.base)));
        let resp = self.send_with_retry(req, "team directory", false).await?;
        let parsed: TeamsResponse = resp
            .json()
            .await
            .map_err(|e| ShiftscopeError::parse(format!("teams response: {e}")))?;

        let mut map = BTreeMap::new();
        for team in parsed.teams {
            if let (Some(id), Some(name)) = (team.id_as_i64(), team.name) {
                map.insert(id, name);
            }
        }
        debug!(teams = map.len(), "team directory fetched");
        Ok(map)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.token)
            .header("Accept", "application/json")
            .header("Intercom-Version", &self.api_version)
    }

    /// Send a request under the retry policy. With `not_found_ok`, a 404
    /// passes through for the caller to interpret.
    async fn send_with_retry(
        &self,
        req: reqwest::RequestBuilder,
        what: &str,
        not_found_ok: bool,
    ) -> Result<reqwest::Response> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let builder = req
                .try_clone()
                .ok_or_else(|| ShiftscopeError::fetch(format!("{what}: request not cloneable")))?;

            match builder.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if not_found_ok && status == StatusCode::NOT_FOUND {
                        return Ok(resp);
                    }
                    match RetryPolicy::classify_status(status) {
                        None => return Ok(resp),
                        Some(RetryClass::Fatal) => {
                            return Err(ShiftscopeError::fetch(format!("{what}: HTTP {status}")));
                        }
                        Some(RetryClass::Retry) => {
                            if !self.retry.attempts_left(attempt) {
                                return Err(ShiftscopeError::fetch(format!(
                                    "{what}: HTTP {status} after {attempt} attempts"
                                )));
                            }
                            let delay = self.retry.delay_after(attempt);
                            warn!(
                                %status,
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                "{what} failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
                Err(e) => {
                    let retryable = RetryPolicy::classify_transport(&e) == RetryClass::Retry;
                    if !retryable || !self.retry.attempts_left(attempt) {
                        return Err(ShiftscopeError::fetch(format!("{what}: {e}")));
                    }
                    let delay = self.retry.delay_after(attempt);
                    warn!(error = %e, attempt, "{what} transport error, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Build the search request body: an AND filter over close timestamps plus
/// the pagination block.
fn search_body(
    start: i64,
    end: i64,
    per_page: u32,
    starting_after: Option<&str>,
) -> serde_json::Value {
    let mut pagination = serde_json::json!({ "per_page": per_page });
    if let Some(cursor) = starting_after {
        pagination["starting_after"] = cursor.into();
    }
    serde_json::json!({
        "query": {
            "operator": "AND",
            "value": [
                { "field": "statistics.last_close_at", "operator": ">", "value": start },
                { "field": "statistics.last_close_at", "operator": "<", "value": end }
            ]
        },
        "pagination": pagination
    })
}
