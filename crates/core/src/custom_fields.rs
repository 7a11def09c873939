//! Per-project custom field schema.
//!
//! Each project decides which extra fields its switches, SFPs and ports
//! carry. Values live in a [`Metadata`] map on the entity row; the set of
//! recognised keys lives in a [`CustomSchema`] on the project row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a custom field name.
pub const MAX_FIELD_NAME_LENGTH: usize = 64;

/// Free-form key/value data attached to a switch, SFP or port.
pub type Metadata = BTreeMap<String, String>;

/// The entity kinds that carry custom metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Switch,
    Sfp,
    Port,
}

impl EntityKind {
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Switch => "switch",
            EntityKind::Sfp => "sfp",
            EntityKind::Port => "port",
        }
    }
}

/// Entity kind -> ordered list of user-defined field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomSchema(BTreeMap<EntityKind, Vec<String>>);

impl CustomSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names registered for `kind`, in insertion order.
    pub fn fields(&self, kind: EntityKind) -> &[String] {
        self.0.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Register a new field name for `kind`.
    pub fn add_field(&mut self, kind: EntityKind, name: &str) -> Result<(), CoreError> {
        let name = validate_field_name(name)?;
        let fields = self.0.entry(kind).or_default();
        if fields.iter().any(|f| f == &name) {
            return Err(CoreError::Conflict(format!(
                "Field '{name}' already exists for {}",
                kind.label()
            )));
        }
        fields.push(name);
        Ok(())
    }

    /// Remove a field name. Returns `false` if it was not registered.
    ///
    /// Existing values stored under the key are left on the entity rows.
    pub fn remove_field(&mut self, kind: EntityKind, name: &str) -> bool {
        let Some(fields) = self.0.get_mut(&kind) else {
            return false;
        };
        let before = fields.len();
        fields.retain(|f| f != name);
        let removed = fields.len() != before;
        if fields.is_empty() {
            self.0.remove(&kind);
        }
        removed
    }

    /// Reject metadata keys that are not registered for `kind`.
    pub fn validate_metadata(&self, kind: EntityKind, metadata: &Metadata) -> Result<(), CoreError> {
        let known = self.fields(kind);
        let unknown: Vec<&str> = metadata
            .keys()
            .filter(|k| !known.contains(k))
            .map(String::as_str)
            .collect();
        if unknown.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Unknown {} field(s): {}",
                kind.label(),
                unknown.join(", ")
            )))
        }
    }

    /// Check every list for empty or duplicate names. Used when a whole
    /// schema is supplied at once (project creation, schema replacement).
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut rebuilt = CustomSchema::new();
        for (kind, fields) in &self.0 {
            for field in fields {
                rebuilt.add_field(*kind, field)?;
            }
        }
        Ok(())
    }
}

fn validate_field_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Field name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_FIELD_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Field name exceeds maximum length of {MAX_FIELD_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_schema_has_no_fields() {
        let schema = CustomSchema::new();
        assert!(schema.fields(EntityKind::Switch).is_empty());
    }

    #[test]
    fn add_field_keeps_insertion_order() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Switch, "rack").unwrap();
        schema.add_field(EntityKind::Switch, "asset_tag").unwrap();
        assert_eq!(schema.fields(EntityKind::Switch), ["rack", "asset_tag"]);
        assert!(schema.fields(EntityKind::Port).is_empty());
    }

    #[test]
    fn duplicate_field_is_conflict() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Sfp, "vendor").unwrap();
        assert_matches!(
            schema.add_field(EntityKind::Sfp, " vendor "),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn same_name_allowed_on_different_kinds() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Sfp, "location").unwrap();
        schema.add_field(EntityKind::Switch, "location").unwrap();
    }

    #[test]
    fn blank_field_rejected() {
        let mut schema = CustomSchema::new();
        assert_matches!(
            schema.add_field(EntityKind::Port, "  "),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn remove_field_reports_presence() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Port, "patch_panel").unwrap();
        assert!(schema.remove_field(EntityKind::Port, "patch_panel"));
        assert!(!schema.remove_field(EntityKind::Port, "patch_panel"));
        assert_eq!(schema, CustomSchema::new());
    }

    #[test]
    fn metadata_with_known_keys_passes() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Switch, "rack").unwrap();
        let md = metadata(&[("rack", "R12")]);
        assert!(schema.validate_metadata(EntityKind::Switch, &md).is_ok());
        assert!(schema
            .validate_metadata(EntityKind::Switch, &Metadata::new())
            .is_ok());
    }

    #[test]
    fn metadata_with_unknown_key_rejected() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Switch, "rack").unwrap();
        let md = metadata(&[("rack", "R12"), ("owner", "ops")]);
        let err = schema
            .validate_metadata(EntityKind::Switch, &md)
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("owner"));
    }

    #[test]
    fn schema_serializes_as_plain_map() {
        let mut schema = CustomSchema::new();
        schema.add_field(EntityKind::Sfp, "vendor").unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, serde_json::json!({"sfp": ["vendor"]}));

        let back: CustomSchema = serde_json::from_value(json).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn validate_catches_duplicates_in_supplied_schema() {
        let schema: CustomSchema =
            serde_json::from_value(serde_json::json!({"port": ["a", "a"]})).unwrap();
        assert!(schema.validate().is_err());
    }
}
