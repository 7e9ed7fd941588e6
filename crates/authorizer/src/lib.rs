//! RSA JWT verification against keys aggregated from JWKS endpoints.
//!
//! Keys are fetched once per call with [`fetch_keys`] (or a configured
//! [`KeyFetcher`]) and handed to [`verify`] (or a configured
//! [`TokenVerifier`]). Nothing is cached between calls.
//!
//! ```no_run
//! # async fn run(token: &str) -> authorizer::Result<()> {
//! let client = reqwest::Client::new();
//! let keys = authorizer::fetch_keys(&client, &["https://auth.example.com/jwks.json"]).await?;
//! let claims = authorizer::verify(token, &keys)?;
//! println!("subject: {:?}", claims.subject());
//! # Ok(())
//! # }
//! ```

mod error;
mod jwks;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod claims;
pub(crate) mod header;
pub(crate) mod url;
pub(crate) mod utils;
pub(crate) mod verifier;

// Public Interface
pub use algorithm::{AlgorithmPolicy, AlgorithmType};
pub use claims::{Claims, ClaimsValidation};
pub use error::{ClaimViolation, Error, Result};
pub use jwks::jwk::VerifyingKey;
pub use jwks::record::{KeyRecord, KeySet};
pub use jwks::{KeyFetcher, fetch_keys};
pub use verifier::{TokenVerifier, verify};

pub(crate) mod limits;
