//! # jsonapi-contract — Response Contract Assertions
//!
//! Assertion helpers shared by the tests of a JSON:API style server. They
//! check that a response body is a document the API definition allows,
//! and that error responses carry the expected status.
//!
//! ## Checks
//!
//! - [`assert_is_response`] / [`check_response`] — top-level document shape:
//!   `data` xor `errors`, `included` only with `data`, the `jsonapi` object
//!   with version `"1.0"` and its `meta` strings, and optionally the self
//!   link.
//! - [`assert_is_error`] / [`check_error`] — the above without a self link,
//!   then a non-empty `errors` array of well-formed error elements whose
//!   first entry matches the expected status and catalog title.
//!
//! Both accept anything convertible into a [`Response`]: a
//! `serde_json::Value`, body text or bytes, an `http::Response`, or a
//! [`ToDocument`] / [`JsonBody`] implementor.
//!
//! ```
//! use jsonapi_contract::{assert_is_error, assert_is_response, SelfLink};
//! use serde_json::json;
//!
//! let jsonapi = json!({
//!     "version": "1.0",
//!     "meta": {"name": "resources", "source": "https://example.org", "description": "test"}
//! });
//!
//! let listing = json!({
//!     "data": [],
//!     "jsonapi": jsonapi,
//!     "links": {"self": "http://localhost:8080/v1/resources"}
//! });
//! assert_is_response(&listing, "http://localhost:8080/v1/resources");
//!
//! let missing = json!({
//!     "errors": [{"status": 404, "title": "Not Found", "detail": "no resource with id 42"}],
//!     "jsonapi": jsonapi,
//! });
//! assert_is_response(&missing, SelfLink::Skip);
//! assert_is_error(&missing, 404);
//! ```
//!
//! ## Crate Policy
//!
//! - Checks never mutate their input and stop at the first violation.
//! - Only the `assert_*` functions panic; the `check_*` functions return
//!   [`ContractError`].

pub mod document;
pub mod error_document;
pub mod normalize;
pub mod validator;

pub use document::SelfLink;
pub use error_document::ErrorElement;
pub use jsonapi_contract_core::{
    Clause, ContractConfig, ContractError, ErrorCatalog, LoadError, Violation,
};
pub use normalize::{normalize, JsonBody, Response, ToDocument};
pub use validator::{default_validator, DocumentValidator};

/// Check the document shape of `response` with the default validator.
///
/// See [`DocumentValidator::check_response`].
pub fn check_response<'a>(
    response: impl Into<Response<'a>>,
    self_link: impl Into<SelfLink>,
) -> Result<(), ContractError> {
    default_validator().check_response(response, self_link)
}

/// Check that `response` is an error document for `status` with the default
/// validator.
///
/// See [`DocumentValidator::check_error`].
pub fn check_error<'a>(
    response: impl Into<Response<'a>>,
    status: u16,
) -> Result<(), ContractError> {
    default_validator().check_error(response, status)
}

/// Panic unless `response` is a well-formed document.
#[track_caller]
pub fn assert_is_response<'a>(
    response: impl Into<Response<'a>>,
    self_link: impl Into<SelfLink>,
) {
    default_validator().assert_response(response, self_link);
}

/// Panic unless `response` is an error document for `status`.
#[track_caller]
pub fn assert_is_error<'a>(response: impl Into<Response<'a>>, status: u16) {
    default_validator().assert_error(response, status);
}
