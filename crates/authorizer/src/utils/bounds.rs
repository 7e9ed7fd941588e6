//! Bounds validation utilities

use crate::error::{ClaimViolation, Error, Result};

/// Apply clock skew to a timestamp with overflow protection
///
/// Overflow can only come from attacker-controlled claim values, so it is
/// reported as a malformed claim.
pub(crate) fn apply_clock_skew(
    timestamp: i64,
    skew_seconds: u64,
    add: bool,
    claim: &str,
) -> Result<i64> {
    let skew_i64 = i64::try_from(skew_seconds)
        .map_err(|_| Error::ConfigurationInvalid("clock skew out of range".into()))?;
    if add {
        timestamp.checked_add(skew_i64)
    } else {
        timestamp.checked_sub(skew_i64)
    }
    .ok_or_else(|| ClaimViolation::Malformed(claim.into()).into())
}

/// Validate token header field size
pub(crate) fn validate_field_size(field: &str, value: &str, max: usize) -> Result<()> {
    if value.len() > max {
        return Err(Error::TokenParse(format!(
            "header field '{field}' too long: {} bytes (maximum: {max} bytes)",
            value.len()
        )));
    }
    Ok(())
}
