//! Item - the data behind one row or cell.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de::{lenient_opt_string, lenient_string, null_as_default};
use crate::error::{ModelError, type_name};
use crate::geometry::Size;
use crate::model::ComponentModel;

/// One renderable row/cell.
///
/// `index` is a position, not an identity: the owning component reassigns it
/// on every reindex pass. `size` is written back by the item manager after
/// the registered view measures the item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub index: usize,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub identifier: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(
        rename = "type",
        alias = "kind",
        default,
        deserialize_with = "lenient_string"
    )]
    pub kind: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: Size,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub meta: IndexMap<String, Value>,
    /// Nested component models rendered inside this item (composite content).
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<ComponentModel>,
}

impl Item {
    /// Create an item with a title and every other field defaulted.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Decode an item from a key-value document.
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        if !value.is_object() {
            return Err(ModelError::Shape {
                expected: "item",
                found: type_name(value),
            });
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<ComponentModel>) -> Self {
        self.children = children;
        self
    }

    /// Raw meta entry.
    pub fn meta_value(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// Typed meta entry. `None` on absence or when the stored value does not
    /// decode as `T`.
    pub fn meta<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.meta
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Whether this item carries nested component content.
    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }
}
