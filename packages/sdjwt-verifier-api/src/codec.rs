//! Conversions between host-side values and the base64 `Binary` envelope
//! CosmWasm contracts expect.
//!
//! JSON-typed payloads go through serde; presentations and other opaque text
//! are carried as raw UTF-8 bytes without JSON quoting.

use cosmwasm_std::Binary;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to encode value as json")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode json value")]
    Decode(#[source] serde_json::Error),
    #[error("payload is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value as JSON into the `Binary` envelope.
pub fn to_wasm_binary<T>(value: &T) -> Result<Binary, Error>
where
    T: Serialize + ?Sized,
{
    serde_json::to_vec(value).map(Binary::from).map_err(Error::Encode)
}

/// Wraps raw text into the `Binary` envelope without JSON quoting.
pub fn text_to_wasm_binary(text: &str) -> Binary {
    Binary::from(text.as_bytes())
}

/// Deserializes a JSON payload out of the `Binary` envelope.
pub fn from_wasm_binary<T>(binary: &Binary) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(binary.as_slice()).map_err(Error::Decode)
}

/// Recovers raw text from the `Binary` envelope.
pub fn text_from_wasm_binary(binary: &Binary) -> Result<String, Error> {
    String::from_utf8(binary.to_vec()).map_err(Error::from)
}
