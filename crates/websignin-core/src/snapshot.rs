//! Property snapshots exchanged with the orchestration engine.
//!
//! A snapshot is an ordered mapping from property name to JSON value, captured
//! once per request. Null-valued properties are dropped on construction, so
//! "absent" and "null" are the same thing for every consumer.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Placeholder the engine sends for values that are not known until apply.
pub const UNKNOWN_VALUE: &str = "04da6b54-80e4-46f7-96ec-b56ff0331ba9";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertySnapshot(IndexMap<String, Value>);

impl PropertySnapshot {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.0.get(property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    /// Whether the engine marked this property as not yet known
    pub fn is_unknown(&self, property: &str) -> bool {
        matches!(self.0.get(property), Some(Value::String(s)) if s == UNKNOWN_VALUE)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Return a new snapshot with `property` set, leaving `self` untouched
    pub fn with(&self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        let property: String = property.into();
        let value = value.into();
        if value.is_null() {
            next.0.shift_remove(&property);
        } else {
            next.0.insert(property, value);
        }
        next
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl FromIterator<(String, Value)> for PropertySnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|(_, v)| !v.is_null()).collect())
    }
}

impl TryFrom<Value> for PropertySnapshot {
    type Error = crate::ProviderError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Ok(serde_json::from_value(other)?),
        }
    }
}

impl<'de> Deserialize<'de> for PropertySnapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Option::<IndexMap<String, Value>>::deserialize(deserializer)?;
        Ok(map.unwrap_or_default().into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nulls_are_dropped() {
        let snapshot: PropertySnapshot =
            serde_json::from_value(json!({"objectId": "abc", "hostName": null})).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert!(snapshot.contains("objectId"));
        assert!(!snapshot.contains("hostName"));
    }

    #[test]
    fn test_null_document_is_empty_snapshot() {
        let snapshot: PropertySnapshot = serde_json::from_value(Value::Null).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_order_is_preserved() {
        let snapshot: PropertySnapshot =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let original: PropertySnapshot =
            serde_json::from_value(json!({"objectId": "abc"})).unwrap();
        let updated = original.with("hostName", "app.example.com");

        assert!(!original.contains("hostName"));
        assert_eq!(updated.get("hostName"), Some(&json!("app.example.com")));

        let cleared = updated.with("hostName", Value::Null);
        assert!(!cleared.contains("hostName"));
    }

    #[test]
    fn test_unknown_marker() {
        let snapshot = PropertySnapshot::new().with("hostName", UNKNOWN_VALUE);
        assert!(snapshot.is_unknown("hostName"));
        assert!(!snapshot.is_unknown("objectId"));
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        assert!(PropertySnapshot::try_from(json!([1, 2])).is_err());
        assert!(PropertySnapshot::try_from(json!("text")).is_err());
        let snapshot = PropertySnapshot::try_from(json!({"a": "b"})).unwrap();
        assert_eq!(snapshot.to_value(), json!({"a": "b"}));
    }
}
