//! Template data: the context templates are rendered against

use serde::Serialize;
use serde_json::{Map, Value};

use super::RenderError;

/// Field marking that the template is rendered for an email
pub const IS_EMAIL_FIELD: &str = "is_email";

/// Field holding the absolute base URL of the site
pub const BASE_URL_FIELD: &str = "base_url";

/// An ordered mapping of field names to values, with an optional failover
/// mapping consulted when a field is not set directly.
///
/// `null` values are treated as absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateData {
    fields: Map<String, Value>,
    failover: Option<Map<String, Value>>,
}

impl TemplateData {
    /// Creates empty template data
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds template data from any value serializing to a JSON object
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self, RenderError> {
        match serde_json::to_value(data) {
            Ok(Value::Object(fields)) => Ok(fields.into()),
            Ok(other) => Err(RenderError::InvalidData(format!(
                "expected an object, got {other}"
            ))),
            Err(e) => Err(RenderError::InvalidData(e.to_string())),
        }
    }

    /// Looks up a field, falling back to the failover mapping
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .get(name)
            .filter(|v| !v.is_null())
            .or_else(|| {
                self.failover
                    .as_ref()
                    .and_then(|f| f.get(name))
                    .filter(|v| !v.is_null())
            })
    }

    /// Looks up a string field
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Whether the field is set, directly or through the failover
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sets a field
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Sets a field only when it is not already present
    pub fn insert_if_absent(&mut self, name: &str, value: impl Into<Value>) {
        if !self.contains(name) {
            self.insert(name, value);
        }
    }

    /// Sets every field of `fields`, keeping their order
    pub fn extend(&mut self, fields: Map<String, Value>) {
        self.fields.extend(fields);
    }

    /// Removes a field from both the direct fields and the failover
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let failover = self.failover.as_mut().and_then(|f| f.shift_remove(name));

        self.fields.shift_remove(name).or(failover)
    }

    /// Replaces the failover mapping
    pub fn set_failover(&mut self, failover: Map<String, Value>) {
        self.failover = Some(failover);
    }

    /// Flattens the data into a single mapping; direct fields shadow the
    /// failover and `null` fields are dropped.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.failover.clone().unwrap_or_default();

        for (name, value) in &self.fields {
            map.insert(name.clone(), value.clone());
        }

        map.retain(|_, v| !v.is_null());
        map
    }
}

impl From<Map<String, Value>> for TemplateData {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            failover: None,
        }
    }
}
