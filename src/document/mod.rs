//! TOML document tree
//!
//! The config file is a flat set of top-level entries (usually hosts, named
//! like `namespace:address`), each a table of string attributes. This
//! module only edits that tree; it never sees the encrypted form.

use std::collections::BTreeMap;

use toml::{Table, Value};

use crate::error::{CmdbError, CmdbResult};

/// One row of `list` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub key: String,
    pub business: String,
    pub comment: String,
}

/// A parsed config document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    table: Table,
}

impl Document {
    /// Parse a document from plaintext bytes
    pub fn parse(bytes: &[u8]) -> CmdbResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CmdbError::Document(format!("Config is not valid UTF-8: {}", e)))?;
        let table: Table = toml::from_str(text)?;
        Ok(Self { table })
    }

    /// Get the value of a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.table.get(key)
    }

    /// Set `key.attr`, or the whole key when `attr` is empty
    ///
    /// A key that holds a non-table value is turned into a table.
    pub fn set(&mut self, key: &str, attr: &str, value: Value) {
        if attr.is_empty() {
            self.table.insert(key.to_string(), value);
            return;
        }

        let entry = self
            .table
            .entry(key.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Value::Table(attrs) = entry {
            attrs.insert(attr.to_string(), value);
        }
    }

    /// Remove `key.attr`; no-op if either is absent
    pub fn delete(&mut self, key: &str, attr: &str) {
        if let Some(Value::Table(attrs)) = self.table.get_mut(key) {
            attrs.remove(attr);
        }
    }

    /// Remove a top-level key; no-op if absent
    pub fn clear(&mut self, key: &str) {
        self.table.remove(key);
    }

    /// Move a key's value to a new name
    pub fn rename(&mut self, old: &str, new: &str) -> CmdbResult<()> {
        let value = self
            .table
            .remove(old)
            .ok_or_else(|| CmdbError::key_not_found(old))?;
        self.table.insert(new.to_string(), value);
        Ok(())
    }

    /// All top-level keys, sorted
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.table.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Keys containing `query` (case-insensitive) with their business and
    /// comment attributes; an empty query lists everything
    pub fn list(&self, query: &str) -> Vec<ListRow> {
        let query = query.to_lowercase();
        self.keys()
            .into_iter()
            .filter(|key| query.is_empty() || key.to_lowercase().contains(&query))
            .map(|key| ListRow {
                key: key.to_string(),
                business: self.attr_text(key, "business"),
                comment: self.attr_text(key, "comment"),
            })
            .collect()
    }

    /// Number of keys per namespace (the part of a key before the first `:`)
    pub fn namespaces(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for key in self.table.keys() {
            let namespace = key.split(':').next().unwrap_or(key);
            *counts.entry(namespace).or_insert(0) += 1;
        }
        counts
    }

    /// Keys starting with `prefix`
    pub fn finger(&self, prefix: &str) -> Vec<&str> {
        self.keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect()
    }

    /// Keys whose name or any value contains `query` (case-insensitive)
    pub fn scan(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.keys()
            .into_iter()
            .filter(|key| {
                key.to_lowercase().contains(&query)
                    || self
                        .table
                        .get(*key)
                        .is_some_and(|value| value_text(value).to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> CmdbResult<String> {
        Ok(toml::to_string(&self.table)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> CmdbResult<String> {
        Ok(serde_json::to_string_pretty(&self.table)?)
    }

    fn attr_text(&self, key: &str, attr: &str) -> String {
        self.table
            .get(key)
            .and_then(|value| value.get(attr))
            .map(value_text)
            .unwrap_or_default()
    }
}

/// Render a value for display: strings without quotes, the rest as TOML
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Table(table) => toml::to_string(table).unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Convert a JSON object into TOML text, prefixing its keys with
/// `prefix:` when a prefix is given
pub fn import_json(json: &str, prefix: &str) -> CmdbResult<String> {
    let data: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;

    let mut table = Table::new();
    for (key, value) in data {
        let key = if prefix.is_empty() {
            key
        } else {
            format!("{}:{}", prefix, key)
        };
        let value = Value::try_from(&value)
            .map_err(|e| CmdbError::Document(format!("Cannot convert {}: {}", key, e)))?;
        table.insert(key, value);
    }

    Ok(toml::to_string(&table)?)
}
