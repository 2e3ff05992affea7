use std::collections::BTreeMap;

use serde_json::Value;

/// The parsed frontmatter of a single document: a read-only mapping from
/// field name to value, supplied to consumers by the [`MetadataIndex`].
///
/// [`MetadataIndex`]: super::MetadataIndex
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataRecord(BTreeMap<String, Value>);

impl MetadataRecord {
    /// Returns the value of the named field, or `None` if absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for MetadataRecord {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        MetadataRecord(iter.into_iter().collect())
    }
}

/// Extract YAML frontmatter from markdown content.
///
/// The block must start on the first line with `---` (an optional BOM is
/// tolerated) and runs until a closing `---` or `...` line. Returns `None`
/// when no valid block is found, including when the block is empty or the
/// YAML does not form a mapping.
pub fn extract_frontmatter(input: &str) -> Option<MetadataRecord> {
    let mut lines = input.lines();

    let first = lines.next()?.trim_start_matches('\u{feff}').trim_end();
    if first != "---" {
        return None;
    }

    let mut yaml_lines: Vec<&str> = Vec::new();
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            break;
        }
        yaml_lines.push(line);
    }

    if yaml_lines.is_empty() {
        return None;
    }

    let yaml_value: serde_yaml::Value = serde_yaml::from_str(&yaml_lines.join("\n")).ok()?;
    let json_value: Value = serde_json::to_value(yaml_value).ok()?;

    match json_value {
        Value::Object(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

/// String form of a metadata value, as the host surface would display it.
///
/// Strings are taken verbatim, numbers and booleans via their display form,
/// arrays comma-joined, null as `null`. Nested mappings fall back to their
/// compact JSON text.
pub fn value_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_display)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}
