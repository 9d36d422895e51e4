//! # Response Normalization
//!
//! Test suites hand the assertions whatever they got back from the server:
//! a parsed `serde_json::Value`, a generated API model, an HTTP response,
//! or the raw body text. [`normalize`] turns each of these into the plain
//! JSON object the document checks work on.
//!
//! The accepted shapes are the variants of [`Response`]. Conversions are
//! chosen by variant, never by probing the value at runtime.

use std::borrow::Cow;
use std::error::Error as StdError;

use jsonapi_contract_core::ContractError;
use serde::Serialize;
use serde_json::{Map, Value};

/// A value that can render itself as a JSON document ("to dictionary").
///
/// Implemented by generated API models that keep their own field layout.
pub trait ToDocument {
    fn to_document(&self) -> Value;
}

/// A value carrying a body that parses as JSON, such as an HTTP response.
pub trait JsonBody {
    /// Parse the body. Failures are reported as
    /// [`ContractError::NotJson`] by the normalizer.
    fn json(&self) -> Result<Value, Box<dyn StdError + Send + Sync>>;
}

impl JsonBody for http::Response<Vec<u8>> {
    fn json(&self) -> Result<Value, Box<dyn StdError + Send + Sync>> {
        Ok(serde_json::from_slice(self.body())?)
    }
}

impl JsonBody for http::Response<String> {
    fn json(&self) -> Result<Value, Box<dyn StdError + Send + Sync>> {
        Ok(serde_json::from_str(self.body())?)
    }
}

/// A response-like value accepted by the assertions.
pub enum Response<'a> {
    /// An already-parsed JSON value.
    Document(Cow<'a, Value>),
    /// A borrowed JSON object, returned as is.
    Map(&'a Map<String, Value>),
    /// A model that converts itself into a document.
    Model(&'a dyn ToDocument),
    /// An object whose body parses as JSON.
    Body(&'a dyn JsonBody),
    /// Serialized JSON text.
    Serialized(&'a str),
    /// Serialized JSON bytes.
    Bytes(&'a [u8]),
}

impl<'a> Response<'a> {
    /// Wrap a [`ToDocument`] implementor.
    pub fn model(model: &'a dyn ToDocument) -> Self {
        Response::Model(model)
    }

    /// Wrap a [`JsonBody`] implementor.
    pub fn body(body: &'a dyn JsonBody) -> Self {
        Response::Body(body)
    }

    /// Serialize any `serde` model into a document.
    pub fn from_serialize<T: Serialize + ?Sized>(model: &T) -> Result<Self, ContractError> {
        let value = serde_json::to_value(model).map_err(not_json)?;
        Ok(Response::Document(Cow::Owned(value)))
    }

    fn kind(&self) -> &'static str {
        match self {
            Response::Document(_) => "document",
            Response::Map(_) => "map",
            Response::Model(_) => "model",
            Response::Body(_) => "body",
            Response::Serialized(_) => "serialized",
            Response::Bytes(_) => "bytes",
        }
    }
}

impl From<Value> for Response<'_> {
    fn from(value: Value) -> Self {
        Response::Document(Cow::Owned(value))
    }
}

impl<'a> From<&'a Value> for Response<'a> {
    fn from(value: &'a Value) -> Self {
        Response::Document(Cow::Borrowed(value))
    }
}

impl From<Map<String, Value>> for Response<'_> {
    fn from(map: Map<String, Value>) -> Self {
        Response::Document(Cow::Owned(Value::Object(map)))
    }
}

impl<'a> From<&'a Map<String, Value>> for Response<'a> {
    fn from(map: &'a Map<String, Value>) -> Self {
        Response::Map(map)
    }
}

impl<'a> From<&'a str> for Response<'a> {
    fn from(text: &'a str) -> Self {
        Response::Serialized(text)
    }
}

impl<'a> From<&'a String> for Response<'a> {
    fn from(text: &'a String) -> Self {
        Response::Serialized(text.as_str())
    }
}

impl<'a> From<&'a [u8]> for Response<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Response::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Response<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Response::Bytes(bytes.as_slice())
    }
}

impl<'a> From<&'a http::Response<Vec<u8>>> for Response<'a> {
    fn from(response: &'a http::Response<Vec<u8>>) -> Self {
        Response::Body(response)
    }
}

impl<'a> From<&'a http::Response<String>> for Response<'a> {
    fn from(response: &'a http::Response<String>) -> Self {
        Response::Body(response)
    }
}

/// Convert a response-like value into a plain JSON object.
///
/// Borrowed documents stay borrowed.
///
/// # Errors
///
/// - [`ContractError::NotJson`] if a body or serialized text does not parse.
/// - [`ContractError::NotAnObject`] if the result is not a JSON object.
pub fn normalize<'a>(
    response: impl Into<Response<'a>>,
) -> Result<Cow<'a, Map<String, Value>>, ContractError> {
    let response = response.into();
    tracing::trace!(kind = response.kind(), "normalizing response");
    let value = match response {
        Response::Map(map) => return Ok(Cow::Borrowed(map)),
        Response::Document(value) => value,
        Response::Model(model) => Cow::Owned(model.to_document()),
        Response::Body(body) => {
            Cow::Owned(body.json().map_err(|e| ContractError::NotJson(e.to_string()))?)
        }
        Response::Serialized(text) => Cow::Owned(serde_json::from_str(text).map_err(not_json)?),
        Response::Bytes(bytes) => Cow::Owned(serde_json::from_slice(bytes).map_err(not_json)?),
    };
    into_object(value)
}

fn into_object(value: Cow<'_, Value>) -> Result<Cow<'_, Map<String, Value>>, ContractError> {
    match value {
        Cow::Borrowed(Value::Object(map)) => Ok(Cow::Borrowed(map)),
        Cow::Owned(Value::Object(map)) => Ok(Cow::Owned(map)),
        other => Err(ContractError::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

fn not_json(e: serde_json::Error) -> ContractError {
    ContractError::NotJson(e.to_string())
}

/// JSON type name used in violation messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
