use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A verified caller identity.
///
/// Anonymous callers have no `Subject` at all; policy code receives
/// `Option<&Subject>` and decides what `None` means.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) admin: bool,
    /// Remaining claims of the verified token, kept for ad hoc checks.
    #[serde(default)]
    pub(crate) attributes: Map<String, Value>,
}

impl Subject {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            admin: false,
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: Map<String, Value>) -> Self {
        self.attributes = attributes;
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Reads a boolean claim. Missing or non-boolean values read as `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.attributes.get(name), Some(Value::Bool(true)))
    }
}
