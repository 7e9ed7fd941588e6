//! DER encoding for turning JWK RSA parameters into SubjectPublicKeyInfo
//!
//! Uses the RustCrypto `spki` and `der` crates; the output is the format
//! aws-lc-rs accepts for `UnparsedPublicKey`.

use crate::error::{Error, Result};
use der::{Encode, Sequence, asn1::UintRef};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

fn encoding_error(operation: &str, details: impl std::fmt::Display) -> Error {
    Error::KeyMaterialization(format!("{operation}: {details}"))
}

/// RSAPublicKey as defined in RFC 8017:
///
/// ```text
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
/// ```
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Build DER-encoded SubjectPublicKeyInfo from modulus (n) and exponent (e) bytes
///
/// Both inputs are big-endian unsigned integers. Range checks on the key size
/// happen before this point; this function only encodes.
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>> {
    use der::asn1::BitString;

    if n.is_empty() || e.is_empty() {
        return Err(encoding_error("rsa key missing n or e", "empty integer"));
    }

    // UintRef handles the leading zero needed for positive INTEGERs
    let n_uint = UintRef::new(n).map_err(|e| encoding_error("failed to encode RSA modulus", e))?;
    let e_uint =
        UintRef::new(e).map_err(|e| encoding_error("failed to encode RSA exponent", e))?;

    let rsa_pubkey_der = RsaPublicKey {
        modulus: n_uint,
        public_exponent: e_uint,
    }
    .to_der()
    .map_err(|e| encoding_error("failed to encode RSA public key", e))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(der::asn1::AnyRef::NULL.into()),
    };

    let subject_public_key = BitString::new(0, rsa_pubkey_der)
        .map_err(|e| encoding_error("failed to create bit string", e))?;

    SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    }
    .to_der()
    .map_err(|e| encoding_error("failed to encode SPKI", e))
}
