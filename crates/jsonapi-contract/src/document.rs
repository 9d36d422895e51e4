//! # Document Shape
//!
//! Structural rules every response document follows, success or error:
//!
//! 1. exactly one of the top-level members `data` and `errors`;
//! 2. `included` only alongside `data`;
//! 3. a non-empty `jsonapi` object declaring the configured version;
//! 4. `jsonapi.meta` carrying `name`, `source` and `description` as strings;
//! 5. optionally, a `links.self` (or legacy `links._self`) equal to the URL
//!    the test requested.
//!
//! Checks run in that order and stop at the first violation.

use jsonapi_contract_core::{Clause, ContractConfig, ContractError, SELF_LINK_PLACEHOLDER};
use serde_json::{Map, Value};

use crate::normalize::json_type_name;

/// What to do with the document's self link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelfLink {
    /// Do not look at `links`.
    Skip,
    /// The test case never said which URL to expect. Reaching the self link
    /// check in this state is a bug in the test case.
    #[default]
    Unspecified,
    /// `links.self` must equal this URL.
    Expect(String),
}

impl SelfLink {
    pub fn expect(url: impl Into<String>) -> Self {
        SelfLink::Expect(url.into())
    }
}

impl From<&str> for SelfLink {
    fn from(url: &str) -> Self {
        SelfLink::Expect(url.to_string())
    }
}

impl From<String> for SelfLink {
    fn from(url: String) -> Self {
        SelfLink::Expect(url)
    }
}

/// `None` skips the check.
impl From<Option<&str>> for SelfLink {
    fn from(url: Option<&str>) -> Self {
        url.map_or(SelfLink::Skip, SelfLink::from)
    }
}

/// Check the top-level structure of a normalized document.
///
/// # Errors
///
/// Returns [`ContractError::Violation`] for the first rule broken, or
/// [`ContractError::CallerMisuse`] if the self link check was reached
/// without a real expected URL.
pub fn check_shape(
    doc: &Map<String, Value>,
    self_link: &SelfLink,
    config: &ContractConfig,
) -> Result<(), ContractError> {
    let has_data = doc.contains_key("data");
    let has_errors = doc.contains_key("errors");
    if has_data && has_errors {
        return Err(ContractError::violation(
            Clause::Conventions,
            "",
            "The members data and errors MUST NOT coexist in the same document.",
        ));
    }
    if !has_data && !has_errors {
        return Err(ContractError::violation(
            Clause::Conventions,
            "",
            "A document MUST contain one of the top-level members data or errors.",
        ));
    }
    if doc.contains_key("included") && !has_data {
        return Err(ContractError::violation(
            Clause::Conventions,
            "/included",
            "If a document does not contain a top-level data key, \
             the included member MUST NOT be present either.",
        ));
    }
    tracing::trace!(has_data, "top-level members ok");

    check_jsonapi(doc, config)?;
    tracing::trace!("jsonapi object ok");

    check_self_link(doc, self_link, config)
}

fn check_jsonapi(doc: &Map<String, Value>, config: &ContractConfig) -> Result<(), ContractError> {
    let jsonapi = match doc.get("jsonapi") {
        Some(Value::Object(jsonapi)) if !jsonapi.is_empty() => jsonapi,
        Some(Value::Object(_)) => {
            return Err(ContractError::violation(
                Clause::JsonapiObject,
                "/jsonapi",
                "the jsonapi attribute must be set in the response, found an empty object",
            ))
        }
        Some(other) => {
            return Err(ContractError::violation(
                Clause::JsonapiObject,
                "/jsonapi",
                format!("jsonapi must be an object, found {}", json_type_name(other)),
            ))
        }
        None => {
            return Err(ContractError::violation(
                Clause::JsonapiObject,
                "/jsonapi",
                "jsonapi must be present, see the api specification.",
            ))
        }
    };

    match jsonapi.get("version") {
        Some(Value::String(v)) if *v == config.jsonapi_version => {}
        Some(other) => {
            return Err(ContractError::violation(
                Clause::JsonapiObject,
                "/jsonapi/version",
                format!("version must be \"{}\", found {other}", config.jsonapi_version),
            ))
        }
        None => {
            return Err(ContractError::violation(
                Clause::JsonapiObject,
                "/jsonapi/version",
                format!("version must be present and be \"{}\"", config.jsonapi_version),
            ))
        }
    }

    let meta = match jsonapi.get("meta") {
        Some(Value::Object(meta)) => meta,
        Some(other) => {
            return Err(ContractError::violation(
                Clause::JsonapiDefinition,
                "/jsonapi/meta",
                format!("meta must be an object, found {}", json_type_name(other)),
            ))
        }
        None => {
            return Err(ContractError::violation(
                Clause::JsonapiDefinition,
                "/jsonapi/meta",
                "meta must be present to contain some information.",
            ))
        }
    };

    for attr in &config.required_meta {
        let pointer = format!("/jsonapi/meta/{}", escape_pointer(attr));
        match meta.get(attr) {
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(ContractError::violation(
                    Clause::JsonapiDefinition,
                    pointer,
                    format!("{attr} must be a string, found {}", json_type_name(other)),
                ))
            }
            None => {
                return Err(ContractError::violation(
                    Clause::JsonapiDefinition,
                    pointer,
                    format!("{attr} must be present"),
                ))
            }
        }
    }
    Ok(())
}

fn check_self_link(
    doc: &Map<String, Value>,
    self_link: &SelfLink,
    config: &ContractConfig,
) -> Result<(), ContractError> {
    let expected = match self_link {
        SelfLink::Skip => return Ok(()),
        SelfLink::Unspecified => {
            return Err(ContractError::CallerMisuse(
                "Change the test case source code to include the url: \
                 no expected self link was given."
                    .to_string(),
            ))
        }
        SelfLink::Expect(url)
            if url == SELF_LINK_PLACEHOLDER || *url == config.self_link_placeholder =>
        {
            return Err(ContractError::CallerMisuse(format!(
                "Change the test case source code to include the url: \
                 the expected self link is still {url:?}."
            )))
        }
        SelfLink::Expect(url) => url,
    };

    let links = match doc.get("links") {
        Some(Value::Object(links)) => links,
        Some(other) => {
            return Err(ContractError::violation(
                Clause::DocumentLinks,
                "/links",
                format!("links must be an object, found {}", json_type_name(other)),
            ))
        }
        None => {
            return Err(ContractError::violation(
                Clause::DocumentLinks,
                "/links",
                format!("links must be present to carry the self link {expected:?}"),
            ))
        }
    };

    let legacy = if config.accept_legacy_self_link {
        links.get("_self").map(|link| ("_self", link))
    } else {
        None
    };
    let Some((key, link)) = links.get("self").map(|link| ("self", link)).or(legacy) else {
        let message = if config.accept_legacy_self_link {
            "links must contain self or _self"
        } else {
            "links must contain self"
        };
        return Err(ContractError::violation(
            Clause::DocumentLinks,
            "/links/self",
            message,
        ));
    };

    if link.as_str() != Some(expected.as_str()) {
        return Err(ContractError::violation(
            Clause::DocumentLinks,
            format!("/links/{key}"),
            format!("self link must be {expected:?}, found {link}"),
        ));
    }
    tracing::trace!(key, link = %expected, "self link ok");
    Ok(())
}

/// Escape a member name for use as a JSON Pointer segment (RFC 6901).
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Map<String, Value> {
        match json!({
            "data": [],
            "jsonapi": {
                "version": "1.0",
                "meta": {"name": "n", "source": "s", "description": "d"}
            }
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn check(doc: &Map<String, Value>, link: SelfLink) -> Result<(), ContractError> {
        check_shape(doc, &link, &ContractConfig::default())
    }

    fn clause_of(result: Result<(), ContractError>) -> Clause {
        match result {
            Err(e) => e.clause().unwrap_or_else(|| panic!("not a violation: {e}")),
            Ok(()) => panic!("expected a violation"),
        }
    }

    #[test]
    fn minimal_document_passes() {
        check(&minimal(), SelfLink::Skip).unwrap();
    }

    #[test]
    fn data_and_errors_coexisting_fails() {
        let mut doc = minimal();
        doc.insert("errors".into(), json!([]));
        assert_eq!(clause_of(check(&doc, SelfLink::Skip)), Clause::Conventions);
    }

    #[test]
    fn neither_data_nor_errors_fails() {
        let mut doc = minimal();
        doc.remove("data");
        assert_eq!(clause_of(check(&doc, SelfLink::Skip)), Clause::Conventions);
    }

    #[test]
    fn included_without_data_fails() {
        let mut doc = minimal();
        doc.remove("data");
        doc.insert("errors".into(), json!([]));
        doc.insert("included".into(), json!([]));
        let err = check(&doc, SelfLink::Skip).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::Conventions));
        assert!(err.to_string().contains("/included"));
    }

    #[test]
    fn included_with_data_passes() {
        let mut doc = minimal();
        doc.insert("included".into(), json!([]));
        check(&doc, SelfLink::Skip).unwrap();
    }

    #[test]
    fn empty_jsonapi_fails() {
        let mut doc = minimal();
        doc.insert("jsonapi".into(), json!({}));
        assert_eq!(clause_of(check(&doc, SelfLink::Skip)), Clause::JsonapiObject);
    }

    #[test]
    fn wrong_version_fails() {
        let mut doc = minimal();
        doc["jsonapi"]["version"] = json!("1.1");
        let err = check(&doc, SelfLink::Skip).unwrap_err();
        assert!(err.to_string().contains("\"1.1\""));

        doc["jsonapi"]["version"] = json!(1.0);
        assert_eq!(clause_of(check(&doc, SelfLink::Skip)), Clause::JsonapiObject);
    }

    #[test]
    fn non_object_jsonapi_fails() {
        let mut doc = minimal();
        doc.insert("jsonapi".into(), json!(true));
        let err = check(&doc, SelfLink::Skip).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::JsonapiObject));
        assert!(err.to_string().contains("found boolean"), "got: {err}");
    }

    #[test]
    fn non_object_meta_fails() {
        let mut doc = minimal();
        doc["jsonapi"]["meta"] = json!("x");
        let err = check(&doc, SelfLink::Skip).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::JsonapiDefinition));
        assert!(err.to_string().contains("meta must be an object, found string"), "got: {err}");
    }

    #[test]
    fn missing_meta_fails() {
        let mut doc = minimal();
        doc["jsonapi"].as_object_mut().unwrap().remove("meta");
        assert_eq!(clause_of(check(&doc, SelfLink::Skip)), Clause::JsonapiDefinition);
    }

    #[test]
    fn non_string_meta_member_fails() {
        let mut doc = minimal();
        doc["jsonapi"]["meta"]["source"] = json!(["https://github.com/schul-cloud"]);
        let err = check(&doc, SelfLink::Skip).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::JsonapiDefinition));
        assert!(err.to_string().contains("/jsonapi/meta/source"));
    }

    #[test]
    fn unspecified_self_link_is_caller_misuse() {
        let err = check(&minimal(), SelfLink::Unspecified).unwrap_err();
        assert!(matches!(err, ContractError::CallerMisuse(_)));
    }

    #[test]
    fn placeholder_self_link_is_caller_misuse() {
        let mut doc = minimal();
        doc.insert("links".into(), json!({"self": "TODO"}));
        let err = check(&doc, SelfLink::from("TODO")).unwrap_err();
        assert!(matches!(err, ContractError::CallerMisuse(_)));
        assert!(err.to_string().contains("include the url"));
    }

    #[test]
    fn todo_rejected_with_custom_placeholder() {
        let mut doc = minimal();
        doc.insert("links".into(), json!({"self": "TODO"}));
        let config = ContractConfig {
            self_link_placeholder: "FIXME".into(),
            ..ContractConfig::default()
        };
        for placeholder in ["TODO", "FIXME"] {
            let err = check_shape(&doc, &placeholder.into(), &config).unwrap_err();
            assert!(matches!(err, ContractError::CallerMisuse(_)), "{placeholder}: {err}");
        }
    }

    #[test]
    fn self_link_matches() {
        let mut doc = minimal();
        doc.insert("links".into(), json!({"self": "http://x/y"}));
        check(&doc, SelfLink::expect("http://x/y")).unwrap();
        assert_eq!(
            clause_of(check(&doc, SelfLink::expect("http://x/z"))),
            Clause::DocumentLinks
        );
    }

    #[test]
    fn legacy_self_link_accepted() {
        let mut doc = minimal();
        doc.insert("links".into(), json!({"_self": "http://x/y"}));
        check(&doc, "http://x/y".into()).unwrap();

        let strict = ContractConfig {
            accept_legacy_self_link: false,
            ..ContractConfig::default()
        };
        let err = check_shape(&doc, &"http://x/y".into(), &strict).unwrap_err();
        assert_eq!(err.clause(), Some(Clause::DocumentLinks));
    }

    #[test]
    fn self_preferred_over_legacy() {
        let mut doc = minimal();
        doc.insert(
            "links".into(),
            json!({"self": "http://x/new", "_self": "http://x/old"}),
        );
        check(&doc, "http://x/new".into()).unwrap();
        let err = check(&doc, "http://x/old".into()).unwrap_err();
        assert!(err.to_string().contains("/links/self"));
    }

    #[test]
    fn links_must_be_object() {
        let mut doc = minimal();
        doc.insert("links".into(), json!("http://x/y"));
        assert_eq!(
            clause_of(check(&doc, "http://x/y".into())),
            Clause::DocumentLinks
        );
    }

    #[test]
    fn missing_links_fails() {
        assert_eq!(
            clause_of(check(&minimal(), "http://x/y".into())),
            Clause::DocumentLinks
        );
    }

    #[test]
    fn none_skips_self_link() {
        assert_eq!(SelfLink::from(None::<&str>), SelfLink::Skip);
        check(&minimal(), SelfLink::from(None::<&str>)).unwrap();
    }

    #[test]
    fn pointer_escaping() {
        assert_eq!(escape_pointer("a/b~c"), "a~1b~0c");
    }
}
