//! Size limit constants for input validation

/// Maximum length for a JWT token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum length for key endpoint URLs (2048 characters)
pub(crate) const MAX_ENDPOINT_URL_LENGTH: usize = 2048;

/// Maximum size for a single JWKS response body (512KB)
pub(crate) const MAX_JWKS_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum number of entries in the `keys` array of one document
pub(crate) const MAX_JWK_SET_SIZE: usize = 100;

// ============================================================================
// Decoded token segment limits
// ============================================================================

/// Maximum size for decoded JWT header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// An 8192-bit RSA signature is exactly 1024 bytes
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum size for Base64URL-encoded signature string (1.5KB)
pub(crate) const MAX_SIGNATURE_B64_SIZE: usize = 1536;

// ============================================================================
// JWK field limits
// ============================================================================

/// Maximum size for Base64URL-encoded RSA modulus (n) field (12KB)
pub(crate) const MAX_JWK_N_SIZE: usize = 12 * 1024;

/// Maximum size for Base64URL-encoded RSA exponent (e) field (64 bytes)
pub(crate) const MAX_JWK_E_SIZE: usize = 64;

/// Maximum size for JWK key ID (kid) field (256 bytes)
pub(crate) const MAX_JWK_KID_SIZE: usize = 256;

/// Maximum size for JWK algorithm (alg) field (16 bytes)
pub(crate) const MAX_JWK_ALG_SIZE: usize = 16;

/// Smallest accepted RSA modulus (2048 bits)
pub(crate) const MIN_RSA_MODULUS_BYTES: usize = 256;

/// Largest accepted RSA modulus (8192 bits)
pub(crate) const MAX_RSA_MODULUS_BYTES: usize = 1024;

/// Largest accepted RSA public exponent (33 bits, rounded up to bytes)
pub(crate) const MAX_RSA_EXPONENT_BYTES: usize = 5;

// ============================================================================
// Header field limits
// ============================================================================

/// Maximum length for algorithm (alg) field in JWT header (16 bytes)
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length for key ID (kid) field in JWT header (256 bytes)
pub(crate) const MAX_KID_LENGTH: usize = 256;

// ============================================================================
// Validation bounds
// ============================================================================

/// Maximum clock skew tolerance (300 seconds = 5 minutes)
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;
