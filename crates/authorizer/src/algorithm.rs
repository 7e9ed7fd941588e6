//! Algorithm support for JWT verification
//!
//! Only the RSASSA-PKCS1-v1_5 family is accepted. Every other `alg` value,
//! including `none` and the HMAC family, is rejected before a key is looked up.
use crate::error::{Error, Result};
use crate::jwks::jwk::VerifyingKey;
use crate::limits::MAX_ALG_LENGTH;

use aws_lc_rs::signature::{
    RSA_PKCS1_2048_8192_SHA256, RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512,
    RsaParameters, UnparsedPublicKey,
};
use std::fmt;
use std::str::FromStr;

/// RSASSA-PKCS1-v1_5 signature algorithm declared in a token header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmType {
    /// SHA-256 digest
    RS256,
    /// SHA-384 digest
    RS384,
    /// SHA-512 digest
    RS512,
}

impl AlgorithmType {
    /// Every supported algorithm, strongest digest last
    pub const ALL: [AlgorithmType; 3] = [Self::RS256, Self::RS384, Self::RS512];

    /// Header name of the algorithm
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
        }
    }

    /// Whether a JWK `alg` value names a member of the RSA signature family
    pub(crate) fn is_rsa_family(alg: &str) -> bool {
        Self::ALL.iter().any(|candidate| candidate.as_str() == alg)
    }

    /// aws-lc-rs parameters; moduli outside 2048..=8192 bits never verify
    fn parameters(&self) -> &'static RsaParameters {
        match self {
            Self::RS256 => &RSA_PKCS1_2048_8192_SHA256,
            Self::RS384 => &RSA_PKCS1_2048_8192_SHA384,
            Self::RS512 => &RSA_PKCS1_2048_8192_SHA512,
        }
    }

    /// Check `signature` over `signing_input` (the `header.payload` text)
    pub(crate) fn verify_signature(
        &self,
        signing_input: &str,
        signature: &[u8],
        key: &VerifyingKey,
    ) -> Result<()> {
        UnparsedPublicKey::new(self.parameters(), key.as_der())
            .verify(signing_input.as_bytes(), signature)
            .map_err(|_| Error::SignatureInvalid)
    }
}

impl FromStr for AlgorithmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::AlgorithmMismatch(format!(
                "algorithm string too long: {} bytes (maximum: {MAX_ALG_LENGTH} bytes)",
                s.len()
            )));
        }
        if s == "none" {
            return Err(Error::AlgorithmMismatch(
                "the 'none' algorithm is rejected".into(),
            ));
        }

        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| Error::AlgorithmMismatch(format!("unexpected signing method: {s}")))
    }
}

impl fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for AlgorithmType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Subset of the RSA family a verifier accepts
///
/// A token declaring an algorithm outside the policy is rejected as an
/// algorithm mismatch before its key is looked up. The default accepts all
/// three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmType>,
}

impl AlgorithmPolicy {
    /// Accept RS256 tokens only
    pub fn rs256_only() -> Self {
        Self::allow_only([AlgorithmType::RS256])
    }

    /// Accept RS384 tokens only
    pub fn rs384_only() -> Self {
        Self::allow_only([AlgorithmType::RS384])
    }

    /// Accept RS512 tokens only
    pub fn rs512_only() -> Self {
        Self::allow_only([AlgorithmType::RS512])
    }

    /// Accept RS256, RS384 and RS512
    pub fn rsa_all() -> Self {
        Self::allow_only(AlgorithmType::ALL)
    }

    /// Accept exactly the given algorithms
    pub fn allow_only(algorithms: impl IntoIterator<Item = AlgorithmType>) -> Self {
        let mut allowed: Vec<_> = algorithms.into_iter().collect();
        allowed.dedup();
        Self { allowed }
    }

    /// Whether `algorithm` is accepted
    pub fn allows(&self, algorithm: AlgorithmType) -> bool {
        self.allowed.contains(&algorithm)
    }

    pub(crate) fn validate(&self, algorithm: &AlgorithmType) -> Result<()> {
        if self.allows(*algorithm) {
            return Ok(());
        }
        let allowed: Vec<_> = self.allowed.iter().map(AlgorithmType::as_str).collect();
        Err(Error::AlgorithmMismatch(format!(
            "algorithm '{algorithm}' not allowed (allowed: {})",
            allowed.join(", ")
        )))
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::rsa_all()
    }
}
