//! # Error Documents
//!
//! An error response is a document whose top-level `errors` member is a
//! non-empty array of `#/definitions/ErrorElement` objects. Every element
//! must carry an integer `status` and string `title` and `detail`.
//!
//! Only the first element is matched against the status the test expects:
//! its `status` must be that code, its `title` the catalog title for it, and
//! its `detail` longer than the title. Further elements are checked for
//! shape only.

use jsonapi_contract_core::{Clause, ContractError, ErrorCatalog};
use serde_json::{Map, Number, Value};

use crate::normalize::json_type_name;

/// A structurally valid entry of a document's `errors` array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorElement<'a> {
    /// Position in `errors`.
    pub index: usize,
    pub status: &'a Number,
    pub title: &'a str,
    pub detail: &'a str,
}

impl<'a> ErrorElement<'a> {
    /// Read the element at `index`, checking its members and their types.
    pub fn from_value(index: usize, value: &'a Value) -> Result<Self, ContractError> {
        let pointer = format!("/errors/{index}");
        let Value::Object(element) = value else {
            return Err(ContractError::violation(
                Clause::ErrorElement,
                pointer,
                format!("error element must be an object, found {}", json_type_name(value)),
            ));
        };

        let status = match member(element, &pointer, "status")? {
            Value::Number(n) if n.is_i64() || n.is_u64() => n,
            other => return Err(wrong_type(&pointer, "status", "an integer", other)),
        };
        let title = match member(element, &pointer, "title")? {
            Value::String(s) => s.as_str(),
            other => return Err(wrong_type(&pointer, "title", "a string", other)),
        };
        let detail = match member(element, &pointer, "detail")? {
            Value::String(s) => s.as_str(),
            other => return Err(wrong_type(&pointer, "detail", "a string", other)),
        };

        Ok(Self {
            index,
            status,
            title,
            detail,
        })
    }

    fn pointer(&self, attr: &str) -> String {
        format!("/errors/{}/{attr}", self.index)
    }
}

fn member<'a>(
    element: &'a Map<String, Value>,
    pointer: &str,
    attr: &str,
) -> Result<&'a Value, ContractError> {
    element.get(attr).ok_or_else(|| {
        ContractError::violation(
            Clause::ErrorElement,
            format!("{pointer}/{attr}"),
            format!("{attr} must be present"),
        )
    })
}

fn wrong_type(pointer: &str, attr: &str, expected: &str, found: &Value) -> ContractError {
    ContractError::violation(
        Clause::ErrorElement,
        format!("{pointer}/{attr}"),
        format!("{attr} must be {expected}, found {}", json_type_name(found)),
    )
}

/// Check the `errors` member of a document that already passed the shape
/// checks, against the status code the test expects.
///
/// # Errors
///
/// - [`ContractError::Violation`] for a missing, empty or malformed `errors`
///   array, or a first element that does not match `expected_status`.
/// - [`ContractError::UnknownStatus`] if `catalog` has no title for
///   `expected_status`.
pub fn check_errors(
    doc: &Map<String, Value>,
    expected_status: u16,
    catalog: &ErrorCatalog,
) -> Result<(), ContractError> {
    let errors = match doc.get("errors") {
        Some(Value::Array(errors)) => errors,
        Some(other) => {
            return Err(ContractError::violation(
                Clause::ErrorDocument,
                "/errors",
                format!("errors must be an array, found {}", json_type_name(other)),
            ))
        }
        None => {
            return Err(ContractError::violation(
                Clause::ErrorDocument,
                "/errors",
                "errors must be present",
            ))
        }
    };

    let elements = errors
        .iter()
        .enumerate()
        .map(|(index, value)| ErrorElement::from_value(index, value))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(first) = elements.first() else {
        return Err(ContractError::violation(
            Clause::ErrorDocument,
            "/errors",
            "errors must contain at least one error element",
        ));
    };
    tracing::trace!(count = elements.len(), "error elements ok");

    if first.status.as_u64() != Some(u64::from(expected_status)) {
        return Err(ContractError::violation(
            Clause::ErrorElement,
            first.pointer("status"),
            format!("status must be {expected_status}, found {}", first.status),
        ));
    }

    let title = catalog
        .title(expected_status)
        .ok_or(ContractError::UnknownStatus(expected_status))?;
    if first.title != title {
        return Err(ContractError::violation(
            Clause::ErrorElement,
            first.pointer("title"),
            format!(
                "title must be {title:?} for status {expected_status}, found {:?}",
                first.title
            ),
        ));
    }

    if first.detail.chars().count() <= first.title.chars().count() {
        return Err(ContractError::violation(
            Clause::ErrorElement,
            first.pointer("detail"),
            format!(
                "detail must explain more than the title {:?}, found {:?}",
                first.title, first.detail
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors_doc(errors: Value) -> Map<String, Value> {
        let mut doc = Map::new();
        doc.insert("errors".into(), errors);
        doc
    }

    fn not_found() -> Value {
        json!({"status": 404, "title": "Not Found", "detail": "resource missing"})
    }

    #[test]
    fn single_not_found_passes() {
        let doc = errors_doc(json!([not_found()]));
        check_errors(&doc, 404, &ErrorCatalog::http()).unwrap();
    }

    #[test]
    fn status_mismatch_fails() {
        let doc = errors_doc(json!([not_found()]));
        let err = check_errors(&doc, 400, &ErrorCatalog::http()).unwrap_err();
        assert!(err.to_string().contains("/errors/0/status"), "got: {err}");
    }

    #[test]
    fn catalog_title_mismatch_fails() {
        let doc = errors_doc(json!([not_found()]));
        let catalog = ErrorCatalog::empty().with_title(404, "Resource Not Found");
        let err = check_errors(&doc, 404, &catalog).unwrap_err();
        assert!(err.to_string().contains("/errors/0/title"), "got: {err}");
    }

    #[test]
    fn status_missing_from_catalog() {
        let doc = errors_doc(json!([not_found()]));
        let err = check_errors(&doc, 404, &ErrorCatalog::empty()).unwrap_err();
        assert!(matches!(err, ContractError::UnknownStatus(404)));
    }

    #[test]
    fn detail_must_be_longer_than_title() {
        let doc = errors_doc(json!([
            {"status": 404, "title": "Not Found", "detail": "Not Found"}
        ]));
        let err = check_errors(&doc, 404, &ErrorCatalog::http()).unwrap_err();
        assert!(err.to_string().contains("/errors/0/detail"), "got: {err}");
    }

    #[test]
    fn detail_length_counts_characters() {
        // Eight characters, sixteen bytes: shorter than the title.
        let catalog = ErrorCatalog::empty().with_title(404, "Not Found");
        let doc = errors_doc(json!([
            {"status": 404, "title": "Not Found", "detail": "ÄÖÜäöüßé"}
        ]));
        assert!(check_errors(&doc, 404, &catalog).is_err());
    }

    #[test]
    fn later_element_missing_detail_fails() {
        let doc = errors_doc(json!([
            not_found(),
            {"status": 400, "title": "Bad Request"}
        ]));
        let err = check_errors(&doc, 404, &ErrorCatalog::http()).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::ErrorElement));
        assert!(err.to_string().contains("/errors/1/detail"), "got: {err}");
    }

    #[test]
    fn only_first_element_matched_against_status() {
        let doc = errors_doc(json!([
            not_found(),
            {"status": 500, "title": "Internal Server Error", "detail": "x"}
        ]));
        check_errors(&doc, 404, &ErrorCatalog::http()).unwrap();
    }

    #[test]
    fn empty_errors_fails() {
        let err = check_errors(&errors_doc(json!([])), 404, &ErrorCatalog::http()).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::ErrorDocument));
    }

    #[test]
    fn errors_must_be_array() {
        let err =
            check_errors(&errors_doc(not_found()), 404, &ErrorCatalog::http()).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::ErrorDocument));
    }

    #[test]
    fn status_types() {
        for status in [json!("404"), json!(404.0), json!(true)] {
            let value = json!({"status": status, "title": "Not Found", "detail": "missing thing"});
            let err = ErrorElement::from_value(0, &value).unwrap_err();
            assert!(err.to_string().contains("integer"), "got: {err}");
        }
    }

    #[test]
    fn element_must_be_object() {
        let err = ErrorElement::from_value(2, &json!("Not Found")).unwrap_err();
        assert!(err.to_string().contains("/errors/2"));
    }
}
