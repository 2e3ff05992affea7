use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use trellis_core::vault::Vault;

use super::behavior::StatusBehavior;

/// One configured relation: a frontmatter match rule paired with a display
/// template and click behavior.
///
/// Serialized in camelCase to stay compatible with the persisted settings
/// schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelationSettings {
    pub frontmatter_key: String,
    pub frontmatter_value: String,
    pub status_format: String,
    /// Optional icon label prefixed to the rendered text; empty means none.
    pub status_icon: String,
    pub status_behavior: StatusBehavior,
}

/// The full persisted settings of the relations extension.
///
/// The relation order is significant: it determines left-to-right placement
/// of status slots. Mutations happen only through explicit edits and always
/// save the whole blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationsSettings {
    pub relations: Vec<RelationSettings>,
}

impl RelationsSettings {
    /// Builds settings from the host-owned blob, merged against defaults.
    ///
    /// A null blob (no settings file yet) and a malformed blob both yield
    /// the defaults; malformed blobs are logged, never fatal.
    pub fn from_value(value: &Value) -> Self {
        if value.is_null() {
            return Self::default();
        }
        match serde_json::from_value(value.clone()) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Malformed relations settings, falling back to defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Loads the settings from the vault's settings store.
    pub async fn load(vault: &Vault) -> trellis_core::vault::Result<Self> {
        let value = vault.read_settings().await?;
        Ok(Self::from_value(&value))
    }

    /// Persists the settings, whole, to the vault's settings store.
    pub async fn save(&self, vault: &Vault) -> trellis_core::vault::Result<()> {
        let value = serde_json::to_value(self)?;
        vault.write_settings(&value).await
    }

    /// Appends a relation at the end of the list.
    pub fn add(&mut self, relation: RelationSettings) {
        self.relations.push(relation);
    }

    /// Removes the relation at `index`, returning it, or `None` when out of
    /// range.
    pub fn remove(&mut self, index: usize) -> Option<RelationSettings> {
        if index < self.relations.len() {
            Some(self.relations.remove(index))
        } else {
            None
        }
    }

    /// Swaps the relation at `index` with its predecessor. No-op at the top
    /// of the list.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index > 0 && index < self.relations.len() {
            self.relations.swap(index - 1, index);
            true
        } else {
            false
        }
    }

    /// Swaps the relation at `index` with its successor. No-op at the end
    /// of the list.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 < self.relations.len() {
            self.relations.swap(index, index + 1);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(key: &str) -> RelationSettings {
        RelationSettings {
            frontmatter_key: key.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn deserializes_wire_schema() {
        let value: Value = serde_json::from_str(
            r#"{ "relations": [ {
                "frontmatterKey": "type",
                "frontmatterValue": "project",
                "statusFormat": "Project: ${name}",
                "statusBehavior": "1"
            } ] }"#,
        )
        .unwrap();

        let settings = RelationsSettings::from_value(&value);
        assert_eq!(settings.relations.len(), 1);
        let r = &settings.relations[0];
        assert_eq!(r.frontmatter_key, "type");
        assert_eq!(r.frontmatter_value, "project");
        assert_eq!(r.status_format, "Project: ${name}");
        assert_eq!(r.status_behavior, StatusBehavior::OpenFile);
        // statusIcon was absent and falls back to empty
        assert_eq!(r.status_icon, "");
    }

    #[test]
    fn null_and_malformed_blobs_yield_defaults() {
        assert_eq!(RelationsSettings::from_value(&Value::Null), RelationsSettings::default());
        let malformed: Value = serde_json::json!({ "relations": "not a list" });
        assert_eq!(RelationsSettings::from_value(&malformed), RelationsSettings::default());
    }

    #[test]
    fn serializes_camel_case() {
        let mut settings = RelationsSettings::default();
        settings.add(RelationSettings {
            frontmatter_key: "type".into(),
            frontmatter_value: "area".into(),
            status_format: "${name}".into(),
            status_icon: "".into(),
            status_behavior: StatusBehavior::HighlightFile,
        });
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["relations"][0]["frontmatterKey"], "type");
        assert_eq!(value["relations"][0]["statusBehavior"], "2");
    }

    #[test]
    fn edit_operations_preserve_order() {
        let mut settings = RelationsSettings::default();
        settings.add(relation("a"));
        settings.add(relation("b"));
        settings.add(relation("c"));

        assert!(settings.move_up(2));
        let keys: Vec<_> = settings.relations.iter().map(|r| r.frontmatter_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c", "b"]);

        assert!(!settings.move_up(0));
        assert!(!settings.move_down(2));

        let removed = settings.remove(1).unwrap();
        assert_eq!(removed.frontmatter_key, "c");
        assert!(settings.remove(5).is_none());
    }
}
