//! Encodings for nested collections.
//!
//! Every collection is `[i32 count]` followed by exactly `count` elements.
//! Entries that do not have the expected shape are either filtered out before
//! counting (item lists) or replaced by empty placeholders after counting
//! (property bags), so the count always matches what follows.

use std::fmt::Display;
use std::io::Write;

use binlog_core::{ItemEntry, ItemValue, PropertyEntry, TaskItem};

use crate::errors::Result;
use crate::primitive::BinaryWriter;

impl<W: Write> BinaryWriter<W> {
    /// Ordered key/value sequence.
    ///
    /// Absent or empty writes `false`; otherwise `true`, the count, and each
    /// pair rendered through [`Display`].
    pub fn write_key_value_pairs<K: Display, V: Display>(
        &mut self,
        pairs: Option<&[(K, V)]>,
    ) -> Result<()> {
        let Some(pairs) = pairs.filter(|p| !p.is_empty()) else {
            return self.write_bool(false);
        };
        self.write_bool(true)?;
        self.write_count("key/value pair", pairs.len())?;
        for (key, value) in pairs {
            self.write_string(&key.to_string())?;
            self.write_string(&value.to_string())?;
        }
        Ok(())
    }

    /// Property bag.
    ///
    /// Absent writes count `0`. Entries whose key or value is not a string are
    /// written as an empty/empty pair so the count stays exact.
    pub fn write_properties(&mut self, properties: Option<&[PropertyEntry]>) -> Result<()> {
        let Some(properties) = properties else {
            return self.write_i32(0);
        };
        self.write_count("property", properties.len())?;
        for entry in properties {
            let (key, value) = entry.as_strings().unwrap_or(("", ""));
            self.write_string(key)?;
            self.write_string(value)?;
        }
        Ok(())
    }

    /// Keyed item list.
    ///
    /// Only entries with a string key and an item value are written; the
    /// count is the filtered count. Each entry is its key followed by the item.
    pub fn write_items(&mut self, items: Option<&[ItemEntry]>) -> Result<()> {
        let Some(items) = items else {
            return self.write_i32(0);
        };
        let entries: Vec<(&str, &dyn TaskItem)> = items
            .iter()
            .filter_map(|entry| Some((entry.key_str()?, entry.value.as_task_item()?)))
            .collect();
        self.write_count("item", entries.len())?;
        for (key, item) in entries {
            self.write_string(key)?;
            self.write_task_item(item)?;
        }
        Ok(())
    }

    /// Unkeyed item list, such as target outputs.
    ///
    /// Values without the item capability are filtered out before counting.
    pub fn write_item_values(&mut self, values: Option<&[ItemValue]>) -> Result<()> {
        let Some(values) = values else {
            return self.write_i32(0);
        };
        let items: Vec<&dyn TaskItem> = values.iter().filter_map(ItemValue::as_task_item).collect();
        self.write_count("item", items.len())?;
        for item in items {
            self.write_task_item(item)?;
        }
        Ok(())
    }

    /// One item: spec, metadata count, then `(name, value)` pairs.
    ///
    /// The count is taken from the pairs [`TaskItem::metadata`] yields, so it
    /// always matches what follows.
    pub fn write_task_item(&mut self, item: &dyn TaskItem) -> Result<()> {
        self.write_string(item.item_spec())?;
        let metadata: Vec<(&str, &str)> = item.metadata().collect();
        self.write_count("metadata", metadata.len())?;
        for (name, value) in metadata {
            self.write_string(name)?;
            self.write_string(value)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
