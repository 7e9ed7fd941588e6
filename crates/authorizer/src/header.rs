use miniserde::Deserialize;

/// JWT header structure
///
/// Only the fields needed for key selection are read; `typ` and any other
/// header parameters are ignored.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenHeader {
    /// Algorithm used for signing
    #[serde(rename = "alg")]
    pub algorithm: String,

    /// Key ID (for key set lookup)
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
}
