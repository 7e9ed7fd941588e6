//! Claims validation for JWT tokens
//!
//! Only the time-bound registered claims (`exp`, `nbf`, `iat`) are enforced.
//! Everything else in the payload is carried through untouched for the caller.

use crate::error::{ClaimViolation, Error, Result};
use crate::limits::MAX_CLOCK_SKEW_SECONDS;
use crate::utils::bounds::apply_clock_skew;
use miniserde::json::{Number, Object, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Decoded token payload
///
/// Only returned once signature and time checks passed.
#[derive(Debug, Clone)]
pub struct Claims {
    fields: Object,
}

impl Claims {
    pub(crate) fn from_json(json: &str) -> Result<Self> {
        let value: Value = miniserde::json::from_str(json)
            .map_err(|e| Error::TokenParse(format!("Failed to parse payload: {e}")))?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(Error::TokenParse("payload must be a JSON object".into())),
        }
    }

    /// Raw claim value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String claim value by name
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Issuer (iss)
    pub fn issuer(&self) -> Option<&str> {
        self.get_str("iss")
    }

    /// Subject (sub)
    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    /// Expiration Time (exp), seconds since Unix epoch
    pub fn expiration(&self) -> Result<Option<i64>> {
        self.numeric_date("exp")
    }

    /// Not Before (nbf), seconds since Unix epoch
    pub fn not_before(&self) -> Result<Option<i64>> {
        self.numeric_date("nbf")
    }

    /// Issued At (iat), seconds since Unix epoch
    pub fn issued_at(&self) -> Result<Option<i64>> {
        self.numeric_date("iat")
    }

    /// All claims as a JSON object
    pub fn as_object(&self) -> &Object {
        &self.fields
    }

    /// Read a NumericDate claim (RFC 7519 Section 2)
    ///
    /// Fractional seconds are truncated. A present claim that is not a finite
    /// number in `i64` range is malformed.
    fn numeric_date(&self, name: &str) -> Result<Option<i64>> {
        let malformed = || Error::from(ClaimViolation::Malformed(name.into()));
        match self.fields.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(Number::I64(n))) => Ok(Some(*n)),
            Some(Value::Number(Number::U64(n))) => {
                i64::try_from(*n).map(Some).map_err(|_| malformed())
            }
            Some(Value::Number(Number::F64(f))) => {
                if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Ok(Some(f.trunc() as i64))
                } else {
                    Err(malformed())
                }
            }
            Some(_) => Err(malformed()),
        }
    }
}

/// Configuration for claims validation
///
/// Missing claims are accepted by default; use `require_expiration` or
/// `require_not_before` to make them mandatory.
#[derive(Debug, Clone)]
pub struct ClaimsValidation {
    validate_exp: bool,
    validate_nbf: bool,
    validate_iat: bool,
    require_exp: bool,
    require_nbf: bool,
    clock_skew_seconds: u64,
}

impl Default for ClaimsValidation {
    fn default() -> Self {
        Self {
            validate_exp: true,
            validate_nbf: true,
            validate_iat: true,
            require_exp: false,
            require_nbf: false,
            clock_skew_seconds: 0,
        }
    }
}

impl ClaimsValidation {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set clock skew tolerance
    ///
    /// # Security
    /// Maximum allowed value is 300 seconds (5 minutes). Larger values are
    /// rejected during verification.
    pub fn clock_skew(mut self, seconds: u64) -> Self {
        self.clock_skew_seconds = seconds;
        self
    }

    /// Reject tokens without an `exp` claim
    pub fn require_expiration(mut self) -> Self {
        self.require_exp = true;
        self
    }

    /// Reject tokens without an `nbf` claim
    pub fn require_not_before(mut self) -> Self {
        self.require_nbf = true;
        self
    }

    /// Disable expiration validation
    pub fn no_exp_validation(mut self) -> Self {
        self.validate_exp = false;
        self
    }

    /// Disable not-before validation
    pub fn no_nbf_validation(mut self) -> Self {
        self.validate_nbf = false;
        self
    }

    /// Disable issued-at validation
    pub fn no_iat_validation(mut self) -> Self {
        self.validate_iat = false;
        self
    }

    pub(crate) fn check_bounds(&self) -> Result<()> {
        if self.clock_skew_seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ConfigurationInvalid(format!(
                "clock skew too large: {} seconds (maximum: {MAX_CLOCK_SKEW_SECONDS} seconds)",
                self.clock_skew_seconds
            )));
        }
        Ok(())
    }
}

/// Validate claims according to configuration at time `now`
pub(crate) fn validate_claims(claims: &Claims, config: &ClaimsValidation, now: i64) -> Result<()> {
    config.check_bounds()?;
    let skew = config.clock_skew_seconds;

    let exp = claims.expiration()?;
    let nbf = claims.not_before()?;
    let iat = claims.issued_at()?;

    if config.require_exp && exp.is_none() {
        return Err(ClaimViolation::Missing("exp".into()).into());
    }
    if config.require_nbf && nbf.is_none() {
        return Err(ClaimViolation::Missing("nbf".into()).into());
    }

    if config.validate_exp {
        if let Some(exp) = exp {
            let exp_with_skew = apply_clock_skew(exp, skew, true, "exp")?;
            if now > exp_with_skew {
                return Err(ClaimViolation::Expired {
                    expired_at: exp,
                    now,
                    skew,
                }
                .into());
            }
        }
    }

    if config.validate_nbf {
        if let Some(nbf) = nbf {
            let nbf_with_skew = apply_clock_skew(nbf, skew, false, "nbf")?;
            if now < nbf_with_skew {
                return Err(ClaimViolation::NotYetValid {
                    not_before: nbf,
                    now,
                    skew,
                }
                .into());
            }
        }
    }

    if config.validate_iat {
        if let Some(iat) = iat {
            let now_with_skew = apply_clock_skew(now, skew, true, "iat")?;
            if iat > now_with_skew {
                return Err(ClaimViolation::IssuedInFuture {
                    issued_at: iat,
                    now,
                    skew,
                }
                .into());
            }
        }
    }

    Ok(())
}

/// Get current Unix timestamp
pub(crate) fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
