//! # Contract Clauses
//!
//! Every violation points back at the part of the document contract it
//! breaks, either a section of the JSON:API format or a definition of the
//! resources API swagger document.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A clause of the response document contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// Top-level member rules: `data` and `errors` never coexist, and
    /// `included` requires `data`.
    Conventions,
    /// The `jsonapi` object and its `version`.
    JsonapiObject,
    /// `#/definitions/Jsonapi`: the `meta` members of the `jsonapi` object.
    JsonapiDefinition,
    /// Top-level `links` and the document self link.
    DocumentLinks,
    /// The top-level `errors` member of an error document.
    ErrorDocument,
    /// `#/definitions/ErrorElement`: one entry of `errors`.
    ErrorElement,
}

impl Clause {
    /// All clauses, in the order the checks run.
    pub const ALL: [Clause; 6] = [
        Clause::Conventions,
        Clause::JsonapiObject,
        Clause::JsonapiDefinition,
        Clause::DocumentLinks,
        Clause::ErrorDocument,
        Clause::ErrorElement,
    ];

    /// Where the clause is defined.
    pub fn reference(self) -> &'static str {
        match self {
            Clause::Conventions => "http://jsonapi.org/format/#conventions",
            Clause::JsonapiObject => "http://jsonapi.org/format/#document-jsonapi-object",
            Clause::JsonapiDefinition => "#/definitions/Jsonapi",
            Clause::DocumentLinks => "http://jsonapi.org/format/#document-links",
            Clause::ErrorDocument => "http://jsonapi.org/format/#errors",
            Clause::ErrorElement => "#/definitions/ErrorElement",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference())
    }
}
