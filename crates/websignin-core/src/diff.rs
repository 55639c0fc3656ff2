//! Diff classification between recorded and requested property snapshots.
//!
//! Each tracked field carries a [`ChangePolicy`]. A change to a field whose
//! identity moves the resource (the directory object ID) is a replace; every
//! other tracked field is patched in place.

use serde::{Deserialize, Serialize};

use crate::descriptor::{HOST_NAME, OBJECT_ID};
use crate::snapshot::PropertySnapshot;

/// How a change to a tracked field is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePolicy {
    /// Destroy the old instance, then create the new one
    Replace,
    /// Patch the existing instance
    UpdateInPlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedField {
    pub name: &'static str,
    pub policy: ChangePolicy,
}

/// Tracked fields of the web sign-in resource, in reporting order.
pub const WEB_SIGN_IN_FIELDS: [TrackedField; 2] = [
    TrackedField {
        name: OBJECT_ID,
        policy: ChangePolicy::Replace,
    },
    TrackedField {
        name: HOST_NAME,
        policy: ChangePolicy::UpdateInPlace,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Add,
    Delete,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub kind: ChangeKind,
    pub policy: ChangePolicy,
}

impl FieldChange {
    pub fn is_replace(&self) -> bool {
        self.policy == ChangePolicy::Replace
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    changes: Vec<FieldChange>,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn changed(&self, field: &str) -> bool {
        self.changes.iter().any(|c| c.field == field)
    }

    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.changes.iter().map(|c| c.field).collect()
    }

    /// Changed fields whose policy is [`ChangePolicy::Replace`]
    pub fn replaces(&self) -> Vec<&'static str> {
        self.changes
            .iter()
            .filter(|c| c.is_replace())
            .map(|c| c.field)
            .collect()
    }

    pub fn requires_replace(&self) -> bool {
        self.changes.iter().any(FieldChange::is_replace)
    }
}

/// Compare `olds` to `news` on each of `fields`, in the order given.
pub fn diff(fields: &[TrackedField], olds: &PropertySnapshot, news: &PropertySnapshot) -> DiffResult {
    let changes: Vec<FieldChange> = fields
        .iter()
        .filter_map(|field| {
            let kind = match (olds.get(field.name), news.get(field.name)) {
                (None, None) => return None,
                (None, Some(_)) => ChangeKind::Add,
                (Some(_), None) => ChangeKind::Delete,
                (Some(old), Some(new)) if old == new => return None,
                (Some(_), Some(_)) => ChangeKind::Update,
            };
            Some(FieldChange {
                field: field.name,
                kind,
                policy: field.policy,
            })
        })
        .collect();

    if !changes.is_empty() {
        tracing::debug!(
            changed = ?changes.iter().map(|c| c.field).collect::<Vec<_>>(),
            "tracked fields changed"
        );
    }

    DiffResult { changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn snapshot(value: Value) -> PropertySnapshot {
        PropertySnapshot::try_from(value).unwrap()
    }

    fn web(olds: Value, news: Value) -> DiffResult {
        diff(&WEB_SIGN_IN_FIELDS, &snapshot(olds), &snapshot(news))
    }

    #[test]
    fn test_equal_snapshots_have_no_change() {
        let props = json!({"objectId": "abc-123", "hostName": "app.example.com"});
        let result = web(props.clone(), props);
        assert!(!result.has_changes());
        assert!(result.changed_fields().is_empty());
        assert!(!result.requires_replace());
    }

    #[test]
    fn test_untracked_fields_are_ignored() {
        let result = web(
            json!({"objectId": "a", "hostName": "h", "note": "x"}),
            json!({"objectId": "a", "hostName": "h", "note": "y"}),
        );
        assert!(!result.has_changes());
    }

    #[test]
    fn test_host_name_only_is_in_place_update() {
        let result = web(
            json!({"objectId": "abc-123", "hostName": "old.example.com"}),
            json!({"objectId": "abc-123", "hostName": "new.example.com"}),
        );
        assert_eq!(result.changed_fields(), vec!["hostName"]);
        assert!(result.replaces().is_empty());
        assert!(!result.requires_replace());
        assert_eq!(result.changes()[0].kind, ChangeKind::Update);
    }

    #[test]
    fn test_object_id_only_is_replace() {
        let result = web(
            json!({"objectId": "abc-123", "hostName": "app.example.com"}),
            json!({"objectId": "def-456", "hostName": "app.example.com"}),
        );
        assert_eq!(result.changed_fields(), vec!["objectId"]);
        assert_eq!(result.replaces(), vec!["objectId"]);
        assert!(result.requires_replace());
    }

    #[test]
    fn test_both_changed_in_fixed_order() {
        let result = web(
            json!({"hostName": "old.example.com", "objectId": "abc-123"}),
            json!({"hostName": "new.example.com", "objectId": "def-456"}),
        );
        assert_eq!(result.changed_fields(), vec!["objectId", "hostName"]);
        assert!(result.changed("objectId"));
        assert!(result.changed("hostName"));
    }

    #[test]
    fn test_appearing_and_disappearing_fields() {
        let result = web(json!({"objectId": "abc-123"}), json!({"hostName": "h"}));
        let kinds: Vec<(&str, ChangeKind)> =
            result.changes().iter().map(|c| (c.field, c.kind)).collect();
        assert_eq!(
            kinds,
            vec![("objectId", ChangeKind::Delete), ("hostName", ChangeKind::Add)]
        );
    }
}
