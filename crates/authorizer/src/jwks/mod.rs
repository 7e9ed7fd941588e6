//! JSON Web Key Set (JWKS) aggregation
//!
//! Endpoints are fetched strictly one after another. The resulting [`KeySet`]
//! is ordered by endpoint, then by position inside each document, so lookups
//! over duplicate key IDs are deterministic.
pub(crate) mod jwk;
pub(crate) mod record;

use crate::error::{Error, Result};
use crate::jwks::record::{KeyRecord, KeySet};
use crate::limits::{MAX_JWK_SET_SIZE, MAX_JWKS_RESPONSE_SIZE};
use crate::url::validate_endpoint_url;
use miniserde::json::Value;
use std::time::Duration;
use tracing::{debug, trace};

/// Fetch data from a URL using reqwest
///
/// The body is read chunk by chunk and abandoned as soon as it grows past
/// `MAX_JWKS_RESPONSE_SIZE`, whether or not a `Content-Length` was sent.
pub(crate) async fn fetch_url(client: &reqwest::Client, url: url::Url) -> Result<Vec<u8>> {
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Transport(format!("network: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::Transport(format!(
            "http: status {}",
            response.status()
        )));
    }

    if let Some(length) = response.content_length() {
        if length > MAX_JWKS_RESPONSE_SIZE as u64 {
            return Err(Error::MalformedKeyDocument(format!(
                "response too large: {length} bytes (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)"
            )));
        }
    }

    let mut body: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::Transport(format!("network: {e}")))?
    {
        if body.len() + chunk.len() > MAX_JWKS_RESPONSE_SIZE {
            return Err(Error::MalformedKeyDocument(format!(
                "response too large: more than {MAX_JWKS_RESPONSE_SIZE} bytes"
            )));
        }
        body.extend_from_slice(&chunk);
    }

    Ok(body)
}

/// Parse a JWKS document body into its key records
///
/// The body must be a JSON object whose `keys` member is an array. Array
/// entries that are not objects are skipped.
pub(crate) fn parse_key_document(bytes: &[u8]) -> Result<Vec<KeyRecord>> {
    if bytes.len() > MAX_JWKS_RESPONSE_SIZE {
        return Err(Error::MalformedKeyDocument(format!(
            "response too large: {} bytes (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)",
            bytes.len()
        )));
    }

    let body = std::str::from_utf8(bytes)
        .map_err(|e| Error::MalformedKeyDocument(format!("utf8 decode failed: {e}")))?;

    let document: Value = miniserde::json::from_str(body)
        .map_err(|_| Error::MalformedKeyDocument("invalid jwks json".into()))?;

    let Value::Object(mut document) = document else {
        return Err(Error::MalformedKeyDocument(
            "jwks document must be a JSON object".into(),
        ));
    };

    let entries = match document.remove("keys") {
        Some(Value::Array(entries)) => entries,
        Some(_) => {
            return Err(Error::MalformedKeyDocument(
                "keys should be of type array".into(),
            ));
        }
        None => {
            return Err(Error::MalformedKeyDocument(
                "missing 'keys' member".into(),
            ));
        }
    };

    if entries.len() > MAX_JWK_SET_SIZE {
        return Err(Error::MalformedKeyDocument(format!(
            "too many keys: {} (maximum: {MAX_JWK_SET_SIZE})",
            entries.len()
        )));
    }

    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(fields) => Some(KeyRecord::from(fields)),
            _ => {
                trace!(index, "skipping non-object key entry");
                None
            }
        })
        .collect();

    Ok(records)
}

/// Fetches and aggregates key sets from a list of endpoints
///
/// The HTTP client is supplied by the caller, who controls per-request
/// timeouts, proxies and TLS. A whole-call deadline can be set on top.
#[derive(Debug, Clone)]
pub struct KeyFetcher {
    client: reqwest::Client,
    deadline: Option<Duration>,
}

impl KeyFetcher {
    /// Create a fetcher around an HTTP client
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            deadline: None,
        }
    }

    /// Bound the whole aggregation call, across all endpoints
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fetch every endpoint in order and concatenate their keys
    ///
    /// Any failure aborts the call and no partial set is returned. Dropping
    /// the future cancels the in-flight request.
    pub async fn fetch<S>(&self, endpoints: &[S]) -> Result<KeySet>
    where
        S: AsRef<str> + Sync,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.fetch_all(endpoints))
                .await
                .map_err(|_| {
                    Error::Transport(format!("deadline of {}ms exceeded", deadline.as_millis()))
                })?,
            None => self.fetch_all(endpoints).await,
        }
    }

    async fn fetch_all<S>(&self, endpoints: &[S]) -> Result<KeySet>
    where
        S: AsRef<str> + Sync,
    {
        let mut keys = KeySet::new();

        for endpoint in endpoints {
            let endpoint = endpoint.as_ref();
            let url = validate_endpoint_url(endpoint)?;

            let bytes = fetch_url(&self.client, url).await.inspect_err(|e| {
                debug!(endpoint, error = %e, "key endpoint fetch failed");
            })?;
            let records = parse_key_document(&bytes).inspect_err(|e| {
                debug!(endpoint, error = %e, "key endpoint returned malformed document");
            })?;

            debug!(endpoint, count = records.len(), "fetched key document");
            keys.extend(records);
        }

        Ok(keys)
    }
}

/// Fetch and aggregate keys from `endpoints` with `client`
///
/// Shorthand for `KeyFetcher::new(client.clone()).fetch(endpoints)`.
pub async fn fetch_keys<S>(client: &reqwest::Client, endpoints: &[S]) -> Result<KeySet>
where
    S: AsRef<str> + Sync,
{
    KeyFetcher::new(client.clone()).fetch(endpoints).await
}
