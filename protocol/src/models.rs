//! Model metadata exchanged with the models-listing endpoint and handed to
//! the picker.
//!
//! The endpoint speaks an OpenAI-compatible `/v1/models` dialect. Only `id`,
//! `owned_by` and `active` drive reconciliation; the remaining fields are
//! carried so payloads round-trip without loss.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;

/// One entry of the remote catalog.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RemoteModelDescriptor {
    /// Model identifier (e.g. "gpt-4o"), unique within one catalog. Entries
    /// without one decode with an empty id and are dropped on reconcile.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default = "default_model_object")]
    pub object: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: i64,
    /// Owner/provider tag (e.g. "openai", "Meta").
    #[serde(default, deserialize_with = "null_as_default")]
    pub owned_by: String,
    /// Whether the backend currently serves this model.
    #[serde(default = "default_active", deserialize_with = "null_as_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<i64>,
    #[serde(default)]
    pub public_apps: Option<Value>,
}

impl RemoteModelDescriptor {
    pub fn new(id: impl Into<String>, owned_by: impl Into<String>, active: bool) -> Self {
        Self {
            id: id.into(),
            object: default_model_object(),
            created: 0,
            owned_by: owned_by.into(),
            active,
            context_window: None,
            public_apps: None,
        }
    }
}

fn default_model_object() -> String {
    "model".to_string()
}

// Catalogs that omit `active` list only servable models.
fn default_active() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|active| active.unwrap_or_else(default_active))
}

/// Response body of the models-listing endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelsListResponse {
    #[serde(default = "default_list_object")]
    pub object: String,
    pub data: Vec<RemoteModelDescriptor>,
}

impl ModelsListResponse {
    pub fn new(data: Vec<RemoteModelDescriptor>) -> Self {
        Self {
            object: default_list_object(),
            data,
        }
    }
}

fn default_list_object() -> String {
    "list".to_string()
}

/// Backend or vendor that serves a group of models.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct ModelProvider {
    pub id: String,
    /// Display name shown as the group heading.
    pub provider_name: String,
    /// Type tag ("custom" for providers introduced by local configuration).
    pub provider_type: String,
    /// Group ordering; lower sorts first.
    pub sorted: i64,
}

/// A selectable model after reconciliation.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CandidateModel {
    /// Model identifier sent to the backend. Unique within a reconciled list.
    pub name: String,
    /// Label shown in the picker.
    pub display_name: String,
    pub available: bool,
    /// Ordering within the provider group; lower sorts first.
    pub sorted: i64,
    pub provider: ModelProvider,
    /// Whether this model is pre-selected for new conversations.
    #[serde(default)]
    pub is_default: bool,
}
