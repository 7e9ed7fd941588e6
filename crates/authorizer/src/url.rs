//! URL validation for key endpoints
//!
//! Rejects empty, overlong, non-HTTP and hostless URLs before any request is
//! made.

use crate::error::{Error, Result};
use crate::limits::MAX_ENDPOINT_URL_LENGTH;

/// Validate a key endpoint URL
pub(crate) fn validate_endpoint_url(endpoint: &str) -> Result<url::Url> {
    if endpoint.trim().is_empty() {
        return Err(Error::ConfigurationInvalid(
            "key endpoint URL cannot be empty".into(),
        ));
    }

    if endpoint.len() > MAX_ENDPOINT_URL_LENGTH {
        return Err(Error::ConfigurationInvalid(format!(
            "key endpoint URL too long: {} characters (maximum: {MAX_ENDPOINT_URL_LENGTH} characters)",
            endpoint.len()
        )));
    }

    let parsed = endpoint
        .parse::<url::Url>()
        .map_err(|e| Error::ConfigurationInvalid(format!("invalid key endpoint URL: {e}")))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::ConfigurationInvalid(
            "key endpoint URL must use http or https scheme".into(),
        ));
    }

    if parsed.host_str().is_none() {
        return Err(Error::ConfigurationInvalid(
            "key endpoint URL must have a valid host".into(),
        ));
    }

    Ok(parsed)
}
