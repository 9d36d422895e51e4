//! # Document Validator
//!
//! Binds the checks to a [`ContractConfig`] and an [`ErrorCatalog`]. The
//! free functions at the crate root use a shared default validator; test
//! suites against a server with its own error titles build one here.

use std::sync::OnceLock;

use jsonapi_contract_core::{ContractConfig, ContractError, ErrorCatalog};

use crate::document::{self, SelfLink};
use crate::error_document;
use crate::normalize::{self, Response};

/// Response contract checks with their configuration and error catalog.
///
/// `DocumentValidator` is `Send + Sync`; share one across test threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    config: ContractConfig,
    catalog: ErrorCatalog,
}

impl DocumentValidator {
    pub fn new(config: ContractConfig, catalog: ErrorCatalog) -> Self {
        Self { config, catalog }
    }

    /// Default configuration with a custom catalog.
    pub fn with_catalog(catalog: ErrorCatalog) -> Self {
        Self::new(ContractConfig::default(), catalog)
    }

    /// Custom configuration with the HTTP reason phrase catalog.
    pub fn with_config(config: ContractConfig) -> Self {
        Self::new(config, ErrorCatalog::default())
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// Check that `response` is a well-formed document.
    ///
    /// `self_link` is the URL expected under `links.self`, or
    /// [`SelfLink::Skip`] to leave `links` alone.
    ///
    /// # Errors
    ///
    /// The first normalization failure, contract violation or caller misuse.
    pub fn check_response<'a>(
        &self,
        response: impl Into<Response<'a>>,
        self_link: impl Into<SelfLink>,
    ) -> Result<(), ContractError> {
        let self_link = self_link.into();
        tracing::debug!(self_link = ?self_link, "checking response document");
        let doc = normalize::normalize(response).map_err(logged)?;
        document::check_shape(&doc, &self_link, &self.config).map_err(logged)
    }

    /// Check that `response` is an error document for `status`.
    ///
    /// Runs the document shape checks without a self link, then the error
    /// element checks.
    ///
    /// # Errors
    ///
    /// The first normalization failure, contract violation, or
    /// [`ContractError::UnknownStatus`] if the catalog has no title for
    /// `status`.
    pub fn check_error<'a>(
        &self,
        response: impl Into<Response<'a>>,
        status: u16,
    ) -> Result<(), ContractError> {
        tracing::debug!(status, "checking error document");
        let doc = normalize::normalize(response).map_err(logged)?;
        document::check_shape(&doc, &SelfLink::Skip, &self.config).map_err(logged)?;
        error_document::check_errors(&doc, status, &self.catalog).map_err(logged)
    }

    /// Panicking form of [`check_response`](Self::check_response).
    #[track_caller]
    pub fn assert_response<'a>(
        &self,
        response: impl Into<Response<'a>>,
        self_link: impl Into<SelfLink>,
    ) {
        if let Err(e) = self.check_response(response, self_link) {
            panic!("response does not match the document contract: {e}");
        }
    }

    /// Panicking form of [`check_error`](Self::check_error).
    #[track_caller]
    pub fn assert_error<'a>(&self, response: impl Into<Response<'a>>, status: u16) {
        if let Err(e) = self.check_error(response, status) {
            panic!("response is not a {status} error document: {e}");
        }
    }
}

fn logged(e: ContractError) -> ContractError {
    match &e {
        ContractError::Violation(v) => {
            tracing::debug!(clause = %v.clause, pointer = %v.pointer, "{}", v.message);
        }
        other => tracing::debug!(error = %other, "response check failed"),
    }
    e
}

/// The validator used by the crate-level functions.
pub fn default_validator() -> &'static DocumentValidator {
    static DEFAULT: OnceLock<DocumentValidator> = OnceLock::new();
    DEFAULT.get_or_init(DocumentValidator::default)
}
