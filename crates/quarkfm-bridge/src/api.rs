//! Request and response shapes shared by every HTTP endpoint the client talks
//! to.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parsed response shape expected from the browse, save and form endpoints.
///
/// Every field is optional on the wire. A response without `success` counts
/// as a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl ApiResult {
    /// Server message, if it carries any visible text.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|message| !message.is_empty())
    }

    /// Redirect target, if the server asked for one.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect
            .as_deref()
            .map(str::trim)
            .filter(|target| !target.is_empty())
    }
}

/// HTTP method declared by a form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl FormMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether fields travel in the request body rather than the query string.
    pub fn has_body(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

/// Flat mapping from field name to value, built fresh for every submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. A later value for the same name replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

/// A serialized form ready to be sent to its declared target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    /// Endpoint the form submits to, relative to the server or absolute.
    pub action: String,
    pub method: FormMethod,
    pub fields: FormFields,
}

/// Result of a submission as seen by the frontend. Transport failures are
/// flattened into their display text since they only ever reach the user.
pub type FormOutcome = Result<ApiResult, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_success_reads_as_failure() {
        let result: ApiResult = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        assert!(!result.success);
        assert_eq!(result.message(), Some("nope"));
        assert_eq!(result.redirect(), None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let result: ApiResult = serde_json::from_str(
            r#"{"success":true,"redirect":"/done","stats":{"success":3,"failed":0}}"#,
        )
        .unwrap();
        assert!(result.success);
        assert_eq!(result.redirect(), Some("/done"));
    }

    #[test]
    fn empty_message_is_treated_as_absent() {
        let result = ApiResult {
            success: true,
            message: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(result.message(), None);
    }

    #[test]
    fn only_get_sends_fields_in_the_query() {
        assert_eq!(FormMethod::default(), FormMethod::Get);
        assert!(!FormMethod::Get.has_body());
        assert!(FormMethod::Patch.has_body());
    }

    #[test]
    fn later_field_wins_and_serializes_flat() {
        let fields: FormFields = [("model", "a"), ("api_key", "k"), ("model", "b")]
            .into_iter()
            .collect();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("model"), Some("b"));

        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({ "api_key": "k", "model": "b" }));
    }
}
