//! Errors for authorizer

use thiserror::Error;

/// Authorizer Errors
///
/// Every failure of key aggregation or token verification maps to exactly one
/// variant. Callers must treat any error as "untrusted token" or "keys
/// unavailable".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Key Aggregation Errors
    // ============================================================================
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed key document: {0}")]
    MalformedKeyDocument(String),

    // ============================================================================
    // Token Errors
    // ============================================================================
    #[error("Token parse error: {0}")]
    TokenParse(String),

    #[error("Algorithm mismatch: {0}")]
    AlgorithmMismatch(String),

    #[error("No key found for kid {kid:?}")]
    KeyNotFound { kid: Option<String> },

    #[error("Key materialization failed: {0}")]
    KeyMaterialization(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Claims invalid: {0}")]
    ClaimsInvalid(#[from] ClaimViolation),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),
}

/// Reason a time-bound claim was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimViolation {
    #[error("token expired at {expired_at} (now: {now}, skew: {skew}s)")]
    Expired {
        expired_at: i64,
        now: i64,
        skew: u64,
    },

    #[error("token not valid until {not_before} (now: {now}, skew: {skew}s)")]
    NotYetValid {
        not_before: i64,
        now: i64,
        skew: u64,
    },

    #[error("token issued in future at {issued_at} (now: {now}, skew: {skew}s)")]
    IssuedInFuture { issued_at: i64, now: i64, skew: u64 },

    #[error("required claim '{0}' is missing")]
    Missing(String),

    #[error("claim '{0}' is not a valid numeric date")]
    Malformed(String),
}

/// Result type alias for authorizer operations
pub type Result<T> = std::result::Result<T, Error>;
