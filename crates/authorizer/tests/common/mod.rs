//! Shared helpers for integration tests
//!
//! Tokens are signed locally with aws-lc-rs using a 2048-bit RSA key
//! generated once per test binary. The matching public key is exposed as a
//! JWK record so tests can assemble key sets and JWKS documents freely.
//!
//! ```rust,ignore
//! let token = TokenBuilder::new("k1")
//!     .subject("user-123")
//!     .expiration(now() + 3600)
//!     .sign();
//! ```

#![allow(dead_code)]

use authorizer::KeyRecord;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    RSA_PKCS1_SHA256, RSA_PKCS1_SHA384, RSA_PKCS1_SHA512, RsaEncoding, RsaKeyPair,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, pkcs8::EncodePrivateKey};
use serde_json::{Value, json};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Test signing key with its public components
pub struct TestKey {
    pub keypair: RsaKeyPair,
    /// Base64URL modulus
    pub n: String,
    /// Base64URL exponent
    pub e: String,
}

impl TestKey {
    fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("Failed to generate key");
        let pkcs8_doc = private_key
            .to_pkcs8_der()
            .expect("Failed to serialize to PKCS#8");
        let keypair = RsaKeyPair::from_pkcs8(pkcs8_doc.as_bytes()).expect("Failed to load key");

        Self {
            keypair,
            n: URL_SAFE_NO_PAD.encode(private_key.n().to_bytes_be()),
            e: URL_SAFE_NO_PAD.encode(private_key.e().to_bytes_be()),
        }
    }

    /// JWK for this key with the given `kid` and extra members
    pub fn jwk(&self, kid: &str) -> Value {
        json!({
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": kid,
            "n": self.n,
            "e": self.e,
        })
    }

    /// JWK for this key as a key record
    pub fn record(&self, kid: &str) -> KeyRecord {
        record(&self.jwk(kid))
    }
}

/// Primary signing key
pub fn signing_key() -> &'static TestKey {
    static KEY: OnceLock<TestKey> = OnceLock::new();
    KEY.get_or_init(TestKey::generate)
}

/// Second, unrelated key for mismatch tests
pub fn other_key() -> &'static TestKey {
    static KEY: OnceLock<TestKey> = OnceLock::new();
    KEY.get_or_init(TestKey::generate)
}

/// Convert a JSON value into a key record
pub fn record(value: &Value) -> KeyRecord {
    KeyRecord::from_json(&value.to_string()).expect("valid key record")
}

/// Wrap JWKs in a JWKS document body
pub fn jwks_body(keys: &[Value]) -> String {
    json!({ "keys": keys }).to_string()
}

/// Builder for locally signed JWT tokens
#[derive(Debug)]
pub struct TokenBuilder {
    header: Value,
    claims: Value,
    raw_claims: Option<String>,
}

impl TokenBuilder {
    /// RS256 token carrying `kid`
    pub fn new(kid: &str) -> Self {
        Self {
            header: json!({ "alg": "RS256", "typ": "JWT", "kid": kid }),
            claims: json!({}),
            raw_claims: None,
        }
    }

    /// Set the `alg` header
    pub fn algorithm(mut self, alg: &str) -> Self {
        self.header["alg"] = json!(alg);
        self
    }

    /// Remove the `kid` header
    pub fn without_kid(mut self) -> Self {
        if let Some(header) = self.header.as_object_mut() {
            header.remove("kid");
        }
        self
    }

    /// Set the subject claim
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.claims["sub"] = json!(sub.into());
        self
    }

    /// Set the expiration time (Unix timestamp)
    pub fn expiration(mut self, exp: i64) -> Self {
        self.claims["exp"] = json!(exp);
        self
    }

    /// Set the not before time (Unix timestamp)
    pub fn not_before(mut self, nbf: i64) -> Self {
        self.claims["nbf"] = json!(nbf);
        self
    }

    /// Set the issued at time (Unix timestamp)
    pub fn issued_at(mut self, iat: i64) -> Self {
        self.claims["iat"] = json!(iat);
        self
    }

    /// Set a custom claim
    pub fn custom_claim(mut self, key: impl Into<String>, value: Value) -> Self {
        self.claims[key.into()] = value;
        self
    }

    /// Use `json` verbatim as the payload, ignoring any claims set
    pub fn raw_claims(mut self, json: impl Into<String>) -> Self {
        self.raw_claims = Some(json.into());
        self
    }

    /// Sign with the primary key
    pub fn sign(self) -> String {
        self.sign_with(signing_key())
    }

    /// Sign with `key`, using the hash matching the `alg` header
    ///
    /// Non-RSA `alg` values are signed with SHA-256 so the token is still
    /// well-formed.
    pub fn sign_with(self, key: &TestKey) -> String {
        let encoding: &'static dyn RsaEncoding = match self.header["alg"].as_str() {
            Some("RS384") => &RSA_PKCS1_SHA384,
            Some("RS512") => &RSA_PKCS1_SHA512,
            _ => &RSA_PKCS1_SHA256,
        };

        let header_b64 = URL_SAFE_NO_PAD.encode(self.header.to_string());
        let payload = self.raw_claims.unwrap_or_else(|| self.claims.to_string());
        let payload_b64 = URL_SAFE_NO_PAD.encode(payload);
        let signing_input = format!("{header_b64}.{payload_b64}");

        let mut signature = vec![0u8; key.keypair.public_modulus_len()];
        key.keypair
            .sign(
                encoding,
                &SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .expect("Failed to sign token");

        format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
    }
}

/// Helper to get current Unix timestamp
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Create a token with an invalid signature by corrupting the last byte
pub fn corrupt_signature(token: &str) -> String {
    let (signing_input, signature_b64) = token.rsplit_once('.').expect("token has a signature");
    let mut signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .expect("signature is base64url");
    if let Some(last) = signature.last_mut() {
        *last ^= 0xFF;
    }
    format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
}
