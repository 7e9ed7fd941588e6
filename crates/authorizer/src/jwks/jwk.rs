//! JWK (JSON Web Key) validation and conversion to a verifying key
//!
//! This is the boundary where an untyped [`KeyRecord`] becomes a structured
//! RSA key. Every shape problem surfaces here as
//! [`Error::KeyMaterialization`].

use crate::algorithm::AlgorithmType;
use crate::error::{Error, Result};
use crate::jwks::record::KeyRecord;
use crate::limits::{
    MAX_JWK_ALG_SIZE, MAX_JWK_E_SIZE, MAX_JWK_KID_SIZE, MAX_JWK_N_SIZE, MAX_RSA_EXPONENT_BYTES,
    MAX_RSA_MODULUS_BYTES, MIN_RSA_MODULUS_BYTES,
};
use crate::utils::base64url;
use miniserde::json::Value;

fn materialization_error(message: impl Into<String>) -> Error {
    Error::KeyMaterialization(message.into())
}

/// RSA public key ready for signature verification
///
/// Holds a DER-encoded SubjectPublicKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    der: Vec<u8>,
}

impl VerifyingKey {
    pub(crate) fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// DER-encoded SubjectPublicKeyInfo
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

/// JSON Web Key (JWK) structure with the fields an RSA verifier needs
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Jwk<'a> {
    /// Key type (must be "RSA")
    pub kty: Option<&'a str>,
    /// Key ID
    pub kid: Option<&'a str>,
    /// Algorithm (advisory per RFC 7517, enforced to be RSA family)
    pub alg: Option<&'a str>,
    /// Key use (RFC 7517 Section 4.2); if absent the key may be used for any purpose
    pub key_use: Option<&'a str>,
    /// RSA modulus (Base64URL-encoded)
    pub n: Option<&'a str>,
    /// RSA exponent (Base64URL-encoded)
    pub e: Option<&'a str>,
}

/// Read an optional string member, rejecting any other JSON type
fn string_member<'a>(record: &'a KeyRecord, name: &str) -> Result<Option<&'a str>> {
    match record.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(materialization_error(format!(
            "jwk field '{name}' must be a string"
        ))),
    }
}

impl<'a> TryFrom<&'a KeyRecord> for Jwk<'a> {
    type Error = Error;

    fn try_from(record: &'a KeyRecord) -> Result<Self> {
        Ok(Self {
            kty: string_member(record, "kty")?,
            kid: string_member(record, "kid")?,
            alg: string_member(record, "alg")?,
            key_use: string_member(record, "use")?,
            n: string_member(record, "n")?,
            e: string_member(record, "e")?,
        })
    }
}

impl Jwk<'_> {
    /// Convert JWK to a verifying key for the token's algorithm
    ///
    /// # Arguments
    /// * `algorithm` - The algorithm from the token header
    /// * `strict_algorithm` - If true, require JWK `alg` field to match token algorithm
    pub(crate) fn to_key(
        &self,
        algorithm: &AlgorithmType,
        strict_algorithm: bool,
    ) -> Result<VerifyingKey> {
        self.validate_jwk_structure()?;
        self.validate_jwk_algorithm(algorithm, strict_algorithm)?;
        self.to_rsa_key()
    }

    /// Validate JWK structure: key type, key use, and field sizes
    fn validate_jwk_structure(&self) -> Result<()> {
        match self.kty {
            Some("RSA") => {}
            Some(kty) => {
                return Err(materialization_error(format!(
                    "key type mismatch: expected RSA, found {kty}"
                )));
            }
            None => return Err(materialization_error("missing key type (kty)")),
        }

        if let Some(use_val) = self.key_use {
            if use_val != "sig" {
                return Err(materialization_error(format!(
                    "key use mismatch: expected 'sig', found '{use_val}'"
                )));
            }
        }

        if let Some(alg) = self.alg {
            if alg.len() > MAX_JWK_ALG_SIZE {
                return Err(materialization_error(format!(
                    "jwk field 'alg' too large: {} bytes (maximum: {MAX_JWK_ALG_SIZE} bytes)",
                    alg.len()
                )));
            }
        }

        if let Some(kid) = self.kid {
            if kid.len() > MAX_JWK_KID_SIZE {
                return Err(materialization_error(format!(
                    "jwk field 'kid' too large: {} bytes (maximum: {MAX_JWK_KID_SIZE} bytes)",
                    kid.len()
                )));
            }
        }

        Ok(())
    }

    /// Validate JWK algorithm field against token algorithm
    ///
    /// A declared `alg` must always belong to the RSA family. In strict mode it
    /// must also be present and equal to the token algorithm.
    fn validate_jwk_algorithm(
        &self,
        algorithm: &AlgorithmType,
        strict_algorithm: bool,
    ) -> Result<()> {
        if let Some(jwk_alg) = self.alg {
            if !AlgorithmType::is_rsa_family(jwk_alg) {
                return Err(materialization_error(format!(
                    "jwk algorithm '{jwk_alg}' is not an RSA signature algorithm"
                )));
            }
            if strict_algorithm && jwk_alg != algorithm.as_str() {
                return Err(materialization_error(format!(
                    "jwk algorithm '{jwk_alg}' doesn't match token algorithm '{algorithm}'"
                )));
            }
        } else if strict_algorithm {
            return Err(materialization_error(
                "strict algorithm mode requires JWK alg field",
            ));
        }
        Ok(())
    }

    /// Convert JWK to DER-encoded RSA public key
    fn to_rsa_key(&self) -> Result<VerifyingKey> {
        const MAX_DECODED_JWK_N: usize = (MAX_JWK_N_SIZE * 3) / 4;
        const MAX_DECODED_JWK_E: usize = (MAX_JWK_E_SIZE * 3) / 4;

        let n = self
            .n
            .ok_or_else(|| materialization_error("rsa key missing n (modulus)"))?;
        let e = self
            .e
            .ok_or_else(|| materialization_error("rsa key missing e (exponent)"))?;

        if n.len() > MAX_JWK_N_SIZE {
            return Err(materialization_error(format!(
                "jwk field 'n' too large: {} bytes (maximum: {MAX_JWK_N_SIZE} bytes)",
                n.len()
            )));
        }
        if e.len() > MAX_JWK_E_SIZE {
            return Err(materialization_error(format!(
                "jwk field 'e' too large: {} bytes (maximum: {MAX_JWK_E_SIZE} bytes)",
                e.len()
            )));
        }

        let n_bytes = base64url::decode_bytes(n, MAX_DECODED_JWK_N)
            .map_err(|e| materialization_error(format!("failed to decode n: {e}")))?;
        let e_bytes = base64url::decode_bytes(e, MAX_DECODED_JWK_E)
            .map_err(|e| materialization_error(format!("failed to decode e: {e}")))?;

        let n_bytes = strip_leading_zeros(&n_bytes);
        let e_bytes = strip_leading_zeros(&e_bytes);

        if !(MIN_RSA_MODULUS_BYTES..=MAX_RSA_MODULUS_BYTES).contains(&n_bytes.len()) {
            return Err(materialization_error(format!(
                "rsa modulus must be 2048 to 8192 bits, found {} bits",
                n_bytes.len() * 8
            )));
        }
        if n_bytes.last().is_some_and(|b| b & 1 == 0) {
            return Err(materialization_error("rsa modulus must be odd"));
        }

        let exponent_is_valid = !e_bytes.is_empty()
            && e_bytes.len() <= MAX_RSA_EXPONENT_BYTES
            && e_bytes.last().is_some_and(|b| b & 1 == 1)
            && !(e_bytes.len() == 1 && e_bytes[0] < 3);
        if !exponent_is_valid {
            return Err(materialization_error(
                "rsa exponent must be an odd integer of at least 3",
            ));
        }

        crate::utils::der::rsa_spki_from_n_e(n_bytes, e_bytes).map(VerifyingKey::from_der)
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

/// Materialize a key record into a verifying key for `algorithm`
pub(crate) fn materialize(
    record: &KeyRecord,
    algorithm: &AlgorithmType,
    strict_algorithm: bool,
) -> Result<VerifyingKey> {
    Jwk::try_from(record)?.to_key(algorithm, strict_algorithm)
}
