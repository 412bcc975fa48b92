//! Validation of the submitted query form.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Required form fields, in the order they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 5] = ["username", "password", "tenant", "sample", "query"];

/// One or more required form fields were absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid request values: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Names of the missing fields.
    pub missing: Vec<&'static str>,
}

/// A validated query submission.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryRequest {
    username: String,
    password: String,
    tenant: String,
    sample: bool,
    query: String,
}

impl QueryRequest {
    /// Validate a decoded form body.
    ///
    /// Every field in [`REQUIRED_FIELDS`] must be present and non-empty. All
    /// missing fields are reported together. `sample` is `true` only when the
    /// submitted value is exactly `"true"`.
    pub fn from_form(form: &HashMap<String, String>) -> Result<Self, ValidationError> {
        let mut missing = Vec::new();
        let [username, password, tenant, sample, query] =
            REQUIRED_FIELDS.map(|name| match form.get(name) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => {
                    missing.push(name);
                    String::new()
                }
            });
        let sample = sample == "true";

        if !missing.is_empty() {
            return Err(ValidationError { missing });
        }

        Ok(Self {
            username,
            password,
            tenant,
            sample,
            query,
        })
    }

    /// Build a request from already separated values, applying the same
    /// non-empty checks as [`QueryRequest::from_form`].
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        tenant: impl Into<String>,
        sample: bool,
        query: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let request = Self {
            username: username.into(),
            password: password.into(),
            tenant: tenant.into(),
            sample,
            query: query.into(),
        };

        let missing: Vec<&'static str> = [
            ("username", &request.username),
            ("password", &request.password),
            ("tenant", &request.tenant),
            ("query", &request.query),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(request)
        } else {
            Err(ValidationError { missing })
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Whether only a sample of the result was requested.
    pub fn sample(&self) -> bool {
        self.sample
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Debug for QueryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant", &self.tenant)
            .field("sample", &self.sample)
            .field("query", &self.query)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn full_form() -> HashMap<String, String> {
        form(&[
            ("username", "jdoe"),
            ("password", "s3cret"),
            ("tenant", "ACME_PRD"),
            ("sample", "true"),
            ("query", "SELECT * FROM r5objects"),
        ])
    }

    #[test]
    fn test_valid_form() {
        let request = QueryRequest::from_form(&full_form()).unwrap();
        assert_eq!(request.username(), "jdoe");
        assert_eq!(request.tenant(), "ACME_PRD");
        assert!(request.sample());
        assert_eq!(request.query(), "SELECT * FROM r5objects");
    }

    #[test]
    fn test_sample_only_true_literal() {
        let mut values = full_form();
        values.insert("sample".to_string(), "on".to_string());
        let request = QueryRequest::from_form(&values).unwrap();
        assert!(!request.sample());
    }

    #[test]
    fn test_missing_query() {
        let mut values = full_form();
        values.remove("query");
        let err = QueryRequest::from_form(&values).unwrap_err();
        assert_eq!(err.missing, vec!["query"]);
        assert_eq!(err.to_string(), "Invalid request values: query");
    }

    #[test]
    fn test_all_missing_fields_listed_in_order() {
        let values = form(&[("tenant", "ACME_PRD"), ("password", "")]);
        let err = QueryRequest::from_form(&values).unwrap_err();
        assert_eq!(err.missing, vec!["username", "password", "sample", "query"]);
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let err = QueryRequest::from_form(&HashMap::new()).unwrap_err();
        assert_eq!(err.missing, REQUIRED_FIELDS.to_vec());
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = QueryRequest::from_form(&full_form()).unwrap();
        let debug = format!("{request:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
