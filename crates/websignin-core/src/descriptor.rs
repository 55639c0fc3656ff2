use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::snapshot::{PropertySnapshot, UNKNOWN_VALUE};

pub const OBJECT_ID: &str = "objectId";
pub const HOST_NAME: &str = "hostName";

/// Desired state of a directory application prepared for web sign-in.
///
/// Built from a [`PropertySnapshot`] once, at the verb boundary. Both fields
/// are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSignInApp {
    pub object_id: String,
    pub host_name: String,
}

impl WebSignInApp {
    pub fn new(object_id: impl Into<String>, host_name: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            host_name: host_name.into(),
        }
    }

    pub fn from_snapshot(snapshot: &PropertySnapshot) -> Result<Self> {
        let object_id = required_string(snapshot, OBJECT_ID)?;
        let host_name = required_string(snapshot, HOST_NAME)?;
        Ok(Self {
            object_id,
            host_name,
        })
    }

    /// Reject a descriptor built from values the engine has not resolved yet.
    ///
    /// Unknown values pass validation during preview; real mutations need them.
    pub fn ensure_known(&self) -> Result<()> {
        for (property, value) in [(OBJECT_ID, &self.object_id), (HOST_NAME, &self.host_name)] {
            if value == UNKNOWN_VALUE {
                return Err(ProviderError::validation(
                    property,
                    format!("input property '{property}' is not known yet"),
                ));
            }
        }
        Ok(())
    }

    /// Recorded output state
    pub fn to_snapshot(&self) -> PropertySnapshot {
        PropertySnapshot::new()
            .with(OBJECT_ID, self.object_id.as_str())
            .with(HOST_NAME, self.host_name.as_str())
    }
}

fn required_string(snapshot: &PropertySnapshot, property: &str) -> Result<String> {
    match snapshot.get(property) {
        None => Err(ProviderError::missing_property(property)),
        Some(Value::String(s)) if s.is_empty() => Err(ProviderError::validation(
            property,
            format!("input property '{property}' must not be empty"),
        )),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ProviderError::validation(
            property,
            format!(
                "expected input property '{property}' of type 'string' but got '{}'",
                type_name(other)
            ),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
