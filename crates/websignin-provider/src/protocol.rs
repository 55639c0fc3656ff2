//! Request and response shapes of the provider protocol.
//!
//! Field names follow the engine's wire format (camelCase JSON). Property
//! bags are carried as [`PropertySnapshot`]s, which drop null values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use websignin_core::{ChangeKind, DiffResult, PropertySnapshot};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub olds: PropertySnapshot,
    #[serde(default)]
    pub news: PropertySnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub property: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub inputs: PropertySnapshot,
    #[serde(default)]
    pub failures: Vec<CheckFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffRequest {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub olds: PropertySnapshot,
    #[serde(default)]
    pub news: PropertySnapshot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffChanges {
    DiffUnknown,
    #[default]
    DiffNone,
    DiffSome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyDiffKind {
    Add,
    AddReplace,
    Delete,
    DeleteReplace,
    Update,
    UpdateReplace,
}

impl PropertyDiffKind {
    pub fn new(kind: ChangeKind, replace: bool) -> Self {
        match (kind, replace) {
            (ChangeKind::Add, false) => Self::Add,
            (ChangeKind::Add, true) => Self::AddReplace,
            (ChangeKind::Delete, false) => Self::Delete,
            (ChangeKind::Delete, true) => Self::DeleteReplace,
            (ChangeKind::Update, false) => Self::Update,
            (ChangeKind::Update, true) => Self::UpdateReplace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDiff {
    pub kind: PropertyDiffKind,
    pub input_diff: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResponse {
    pub changes: DiffChanges,
    #[serde(default)]
    pub diffs: Vec<String>,
    #[serde(default)]
    pub replaces: Vec<String>,
    #[serde(default)]
    pub delete_before_replace: bool,
    #[serde(default)]
    pub detailed_diff: IndexMap<String, PropertyDiff>,
    #[serde(default)]
    pub has_detailed_diff: bool,
}

impl From<&DiffResult> for DiffResponse {
    fn from(result: &DiffResult) -> Self {
        if !result.has_changes() {
            return Self::default();
        }

        let detailed_diff = result
            .changes()
            .iter()
            .map(|change| {
                (
                    change.field.to_string(),
                    PropertyDiff {
                        kind: PropertyDiffKind::new(change.kind, change.is_replace()),
                        input_diff: true,
                    },
                )
            })
            .collect();

        Self {
            changes: DiffChanges::DiffSome,
            diffs: result.changed_fields().into_iter().map(String::from).collect(),
            replaces: result.replaces().into_iter().map(String::from).collect(),
            // The old claim is released before the new object is configured.
            delete_before_replace: result.requires_replace(),
            detailed_diff,
            has_detailed_diff: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub properties: PropertySnapshot,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub id: String,
    pub properties: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub olds: PropertySnapshot,
    #[serde(default)]
    pub news: PropertySnapshot,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub properties: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
    #[serde(default)]
    pub urn: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub properties: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    pub id: String,
    pub properties: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructRequest {
    #[serde(default, rename = "type")]
    pub type_token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructResponse {
    pub urn: String,
    pub state: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    #[serde(default)]
    pub tok: String,
    #[serde(default)]
    pub args: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeResponse {
    #[serde(rename = "return")]
    pub return_value: PropertySnapshot,
    #[serde(default)]
    pub failures: Vec<CheckFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRequest {
    #[serde(default)]
    pub variables: IndexMap<String, String>,
    #[serde(default)]
    pub args: PropertySnapshot,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureResponse {
    pub accept_secrets: bool,
    pub supports_preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInfo {
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSchemaRequest {
    #[serde(default)]
    pub version: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSchemaResponse {
    pub schema: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}
