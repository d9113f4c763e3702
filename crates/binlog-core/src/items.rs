//! Items, item collections and property bags.
//!
//! Producers hand the writer loosely typed collections: property keys and
//! values are arbitrary [`serde_json::Value`]s, and item entries may hold
//! values that are not items at all. Only entries with the right shape are
//! encoded; see the writer's structured encoder for the exact policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The "task item" capability: a spec string plus ordered metadata.
pub trait TaskItem {
    /// Primary item spec (usually a path).
    fn item_spec(&self) -> &str;

    /// Number of metadata entries [`metadata`](Self::metadata) yields.
    ///
    /// Informational; encoders count the yielded pairs instead.
    fn metadata_count(&self) -> usize {
        self.metadata().count()
    }

    /// Metadata `(name, value)` pairs in insertion order.
    fn metadata(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_>;
}

/// A concrete item with a spec and ordered metadata.
///
/// Duplicate metadata names are kept as-is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Item spec.
    pub item_spec: String,
    /// Metadata in insertion order.
    #[serde(default)]
    pub metadata: Vec<(String, String)>,
}

impl Item {
    /// Create an item with no metadata.
    #[must_use]
    pub fn new(item_spec: impl Into<String>) -> Self {
        Self {
            item_spec: item_spec.into(),
            metadata: Vec::new(),
        }
    }

    /// Append a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((name.into(), value.into()));
        self
    }

    /// First metadata value with the given name.
    #[must_use]
    pub fn get_metadata(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl TaskItem for Item {
    fn item_spec(&self) -> &str {
        &self.item_spec
    }

    fn metadata_count(&self) -> usize {
        self.metadata.len()
    }

    fn metadata(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        Box::new(self.metadata.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }
}

/// A value slot in an item collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum ItemValue {
    /// A real item.
    Item(Item),
    /// Anything else a producer put in the collection.
    Opaque(Value),
}

impl ItemValue {
    /// The task-item capability, if this value has it.
    #[must_use]
    pub fn as_task_item(&self) -> Option<&dyn TaskItem> {
        match self {
            Self::Item(item) => Some(item),
            Self::Opaque(_) => None,
        }
    }
}

impl From<Item> for ItemValue {
    fn from(item: Item) -> Self {
        Self::Item(item)
    }
}

/// A keyed entry in a project's item collection (key is the item type).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    /// Item type; only string keys are encoded.
    pub key: Value,
    /// The item.
    pub value: ItemValue,
}

impl ItemEntry {
    /// An entry with a string key and a real item.
    #[must_use]
    pub fn new(item_type: impl Into<String>, item: Item) -> Self {
        Self {
            key: Value::String(item_type.into()),
            value: ItemValue::Item(item),
        }
    }

    /// String key, if the key is a string.
    #[must_use]
    pub fn key_str(&self) -> Option<&str> {
        self.key.as_str()
    }
}

/// A single property bag entry with loosely typed key and value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    /// Property name.
    pub key: Value,
    /// Property value.
    pub value: Value,
}

impl PropertyEntry {
    /// A string/string entry.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Value::String(key.into()),
            value: Value::String(value.into()),
        }
    }

    /// Both key and value, if both are strings.
    #[must_use]
    pub fn as_strings(&self) -> Option<(&str, &str)> {
        Some((self.key.as_str()?, self.value.as_str()?))
    }
}

/// Ordered build properties.
pub type PropertyBag = Vec<PropertyEntry>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
