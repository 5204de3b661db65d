//! Entry display formatting
//!
//! Formats config entries, key listings and namespace counts for terminal
//! output.

use std::collections::BTreeMap;

use toml::Value;

use crate::document::{value_text, ListRow};

const SEPARATOR_WIDTH: usize = 50;

/// Format one entry: the key, its attributes, then a separator line
pub fn format_entry(key: &str, value: &Value) -> String {
    let mut output = format!("{}\n", key);

    match value {
        Value::Table(attrs) => {
            for (name, attr) in attrs {
                match attr {
                    Value::Table(nested) => {
                        output.push_str(&format!("{}:\n", name));
                        for (inner, inner_value) in nested {
                            output.push_str(&format!("  {} = {}\n", inner, value_text(inner_value)));
                        }
                    }
                    other => output.push_str(&format!("{} = {}\n", name, value_text(other))),
                }
            }
        }
        other => output.push_str(&format!("{}\n", value_text(other))),
    }

    output.push_str(&"-".repeat(SEPARATOR_WIDTH));
    output.push('\n');
    output
}

/// Format `list` rows as tab-separated key, business and comment
pub fn format_list(rows: &[ListRow]) -> String {
    rows.iter()
        .map(|row| format!("{}\t{}\t{}\n", row.key, row.business, row.comment))
        .collect()
}

/// Format namespace counts as a two-column table
pub fn format_namespaces(counts: &BTreeMap<&str, usize>) -> String {
    let mut output = format!("{:>10}: {}\n", "namespace", "config number");
    for (namespace, count) in counts {
        output.push_str(&format!("{:>10}: {}\n", namespace, count));
    }
    output
}
