//! Object mapper: converts domain values to and from JSON text.
//!
//! `LinkerClient` takes the mapper as a type parameter so a caller can swap in
//! a mapper with different settings without touching the client.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

pub trait ObjectMapper {
    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, ApiError>;

    fn from_json<T: DeserializeOwned>(&self, body: &str) -> Result<T, ApiError>;
}

/// `serde_json`-backed mapper used by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMapper;

impl ObjectMapper for JsonMapper {
    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, ApiError> {
        serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
    }

    fn from_json<T: DeserializeOwned>(&self, body: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}
