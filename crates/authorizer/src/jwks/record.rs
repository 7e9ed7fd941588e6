//! Key records as fetched from key set documents

use crate::error::{Error, Result};
use miniserde::json::{Object, Value};
use std::ops::Deref;

/// One entry of a JWKS `keys` array
///
/// The record is kept as the raw JSON object it was fetched as. Structural
/// validation happens only when a record is selected for verification, so a
/// record with odd fields never breaks aggregation.
#[derive(Debug, Clone)]
pub struct KeyRecord {
    fields: Object,
}

impl KeyRecord {
    /// Parse a single JWK object from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = miniserde::json::from_str(json)
            .map_err(|_| Error::MalformedKeyDocument("key record is not valid JSON".into()))?;
        Self::try_from(value)
    }

    /// Raw field value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// String field value by name; `None` when absent or not a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Key ID (`kid`)
    pub fn kid(&self) -> Option<&str> {
        self.get_str("kid")
    }

    /// Key type (`kty`)
    pub fn kty(&self) -> Option<&str> {
        self.get_str("kty")
    }

    /// Declared algorithm (`alg`)
    pub fn alg(&self) -> Option<&str> {
        self.get_str("alg")
    }

    /// Intended key use (`use`)
    pub fn key_use(&self) -> Option<&str> {
        self.get_str("use")
    }

    /// Underlying JSON object
    pub fn as_object(&self) -> &Object {
        &self.fields
    }

    /// Serialize the record back to JSON
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(&self.fields)
    }
}

impl From<Object> for KeyRecord {
    fn from(fields: Object) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for KeyRecord {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(Error::MalformedKeyDocument(
                "key record must be a JSON object".into(),
            )),
        }
    }
}

/// Ordered collection of key records
///
/// Order is endpoint order, then document order. Duplicate key IDs are kept;
/// lookups return the first match.
#[derive(Debug, Clone, Default)]
pub struct KeySet {
    keys: Vec<KeyRecord>,
}

impl KeySet {
    /// Create an empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(&mut self, record: KeyRecord) {
        self.keys.push(record);
    }

    /// First record whose `kid` equals `kid`
    pub fn find(&self, kid: &str) -> Option<&KeyRecord> {
        self.keys.iter().find(|record| record.kid() == Some(kid))
    }

    /// Consume the set, returning the records in order
    pub fn into_inner(self) -> Vec<KeyRecord> {
        self.keys
    }
}

impl Deref for KeySet {
    type Target = [KeyRecord];

    fn deref(&self) -> &Self::Target {
        &self.keys
    }
}

impl From<Vec<KeyRecord>> for KeySet {
    fn from(keys: Vec<KeyRecord>) -> Self {
        Self { keys }
    }
}

impl FromIterator<KeyRecord> for KeySet {
    fn from_iter<I: IntoIterator<Item = KeyRecord>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl Extend<KeyRecord> for KeySet {
    fn extend<I: IntoIterator<Item = KeyRecord>>(&mut self, iter: I) {
        self.keys.extend(iter);
    }
}

impl IntoIterator for KeySet {
    type Item = KeyRecord;
    type IntoIter = std::vec::IntoIter<KeyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeySet {
    type Item = &'a KeyRecord;
    type IntoIter = std::slice::Iter<'a, KeyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
