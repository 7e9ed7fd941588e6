use crate::algorithm::{AlgorithmPolicy, AlgorithmType};
use crate::claims::{Claims, ClaimsValidation, current_timestamp, validate_claims};
use crate::error::{Error, Result};
use crate::header::TokenHeader;
use crate::jwks::jwk::materialize;
use crate::jwks::record::KeySet;
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE,
    MAX_DECODED_SIGNATURE_SIZE, MAX_KID_LENGTH, MAX_SIGNATURE_B64_SIZE, MAX_TOKEN_LENGTH,
};
use crate::utils::base64url;
use crate::utils::bounds::validate_field_size;
use tracing::debug;

/// JWT token verifier
///
/// The verifier holds configuration only. Keys are passed per call, so one
/// verifier can be shared across threads and reused with freshly fetched
/// key sets.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    config_algorithms: AlgorithmPolicy,
    config_claims: ClaimsValidation,
    config_strict_algorithm: bool,
}

/// Token split into its segments, with header and payload decoded
struct TokenParts<'a> {
    signing_input: &'a str,
    signature_b64: &'a str,
    header: TokenHeader,
    payload: Claims,
}

impl TokenVerifier {
    /// Create a new verifier accepting RS256, RS384 and RS512
    pub fn new() -> Self {
        Self {
            config_algorithms: AlgorithmPolicy::default(),
            config_claims: ClaimsValidation::default(),
            config_strict_algorithm: false,
        }
    }

    /// Configure the algorithm policy
    pub fn algorithms(&mut self, policy: AlgorithmPolicy) -> &mut Self {
        self.config_algorithms = policy;
        self
    }

    /// Configure claims validation
    pub fn validate(&mut self, config: ClaimsValidation) -> &mut Self {
        self.config_claims = config;
        self
    }

    /// Require the selected key's `alg` to be present and equal to the token's
    pub fn strict_algorithm(&mut self, strict: bool) -> &mut Self {
        self.config_strict_algorithm = strict;
        self
    }

    /// Finish configuration
    pub fn build(&mut self) -> Self {
        self.clone()
    }
}

impl TokenVerifier {
    /// Verify a JWT token string against `keys` at the current time
    ///
    /// Returns the decoded claims if every check passes.
    pub fn verify(&self, token: &str, keys: &KeySet) -> Result<Claims> {
        self.verify_at(token, keys, current_timestamp())
    }

    /// Verify a JWT token string against `keys` at Unix time `now`
    #[tracing::instrument(level = "debug", skip_all, fields(now = now))]
    pub fn verify_at(&self, token: &str, keys: &KeySet, now: i64) -> Result<Claims> {
        self.verify_inner(token, keys, now).inspect_err(|e| {
            debug!(error = %e, "token rejected");
        })
    }

    fn verify_inner(&self, token: &str, keys: &KeySet, now: i64) -> Result<Claims> {
        // 1. Parse token parts (header, payload, signature)
        let parts = Self::parse_token_parts(token)?;

        // 2. Check algorithm before touching any key
        let algorithm: AlgorithmType = parts.header.algorithm.parse()?;
        self.config_algorithms.validate(&algorithm)?;

        // 3. Select key by kid, first match only
        let kid = parts.header.key_id.as_deref();
        let record = kid
            .and_then(|kid| keys.find(kid))
            .ok_or_else(|| Error::KeyNotFound {
                kid: kid.map(str::to_owned),
            })?;

        // 4. Materialize the selected record
        let key = materialize(record, &algorithm, self.config_strict_algorithm)?;

        // 5. Verify signature
        let signature = base64url::decode_bytes(parts.signature_b64, MAX_DECODED_SIGNATURE_SIZE)
            .map_err(|_| Error::SignatureInvalid)?;
        algorithm.verify_signature(parts.signing_input, &signature, &key)?;

        // 6. Validate time-bound claims
        validate_claims(&parts.payload, &self.config_claims, now)?;

        debug!(kid, %algorithm, "token accepted");
        Ok(parts.payload)
    }

    /// Parse token into component parts with validation
    ///
    /// Validates token length, splits into parts and decodes header and
    /// payload. The signature is only size-checked here.
    fn parse_token_parts(token: &str) -> Result<TokenParts<'_>> {
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenParse(format!(
                "token too large: {} bytes (maximum: {MAX_TOKEN_LENGTH} bytes)",
                token.len()
            )));
        }

        let (signing_input, signature_b64) = token
            .rsplit_once('.')
            .ok_or_else(|| Error::TokenParse("token must have 3 segments".into()))?;
        let (header_b64, payload_b64) = signing_input
            .split_once('.')
            .ok_or_else(|| Error::TokenParse("token must have 3 segments".into()))?;
        if payload_b64.contains('.') {
            return Err(Error::TokenParse("token must have 3 segments".into()));
        }

        if signature_b64.len() > MAX_SIGNATURE_B64_SIZE {
            return Err(Error::TokenParse(format!(
                "signature too large: {} bytes (maximum: {MAX_SIGNATURE_B64_SIZE} bytes)",
                signature_b64.len()
            )));
        }

        let header_json = base64url::decode_string(header_b64, MAX_DECODED_HEADER_SIZE)?;
        let header: TokenHeader = miniserde::json::from_str(&header_json)
            .map_err(|e| Error::TokenParse(format!("Failed to parse header: {e}")))?;

        validate_field_size("alg", &header.algorithm, MAX_ALG_LENGTH)?;
        if let Some(kid) = &header.key_id {
            validate_field_size("kid", kid, MAX_KID_LENGTH)?;
        }

        let payload_json = base64url::decode_string(payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
        let payload = Claims::from_json(&payload_json)?;

        Ok(TokenParts {
            signing_input,
            signature_b64,
            header,
            payload,
        })
    }
}

impl Default for TokenVerifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Verify `token` against `keys` with the default verifier
///
/// Accepts RS256, RS384 and RS512 and checks `exp`, `nbf` and `iat` with no
/// clock skew.
pub fn verify(token: &str, keys: &KeySet) -> Result<Claims> {
    TokenVerifier::new().verify(token, keys)
}
