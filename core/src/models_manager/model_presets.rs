use once_cell::sync::Lazy;
use roster_protocol::ModelProvider;
use roster_protocol::RemoteModelDescriptor;

/// Picked as the default when nothing else is configured and the model is
/// in the catalog.
pub const PREFERRED_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// A curated model kept in the picker regardless of what the catalog
/// returns. Sort values are assigned during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackModel {
    pub name: String,
    pub display_name: String,
    pub available: bool,
    pub provider_id: String,
    pub provider_name: String,
    pub provider_type: String,
}

impl FallbackModel {
    fn new(name: &str, display_name: &str, provider_id: &str, provider_name: &str) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            available: true,
            provider_id: provider_id.to_string(),
            provider_name: provider_name.to_string(),
            provider_type: provider_id.to_string(),
        }
    }

    /// The catalog entry this preset stands in for, so exclusion rules apply
    /// to presets the same way they apply to remote models.
    pub(crate) fn descriptor(&self) -> RemoteModelDescriptor {
        RemoteModelDescriptor::new(self.name.as_str(), self.provider_id.as_str(), self.available)
    }

    pub(crate) fn provider(&self, sorted: i64) -> ModelProvider {
        ModelProvider {
            id: self.provider_id.clone(),
            provider_name: self.provider_name.clone(),
            provider_type: self.provider_type.clone(),
            sorted,
        }
    }
}

static PRESETS: Lazy<Vec<FallbackModel>> = Lazy::new(|| {
    vec![
        FallbackModel::new(
            PREFERRED_DEFAULT_MODEL,
            "Llama 3.3 70B Versatile",
            "groq",
            "Groq",
        ),
        FallbackModel::new("llama-3.1-8b-instant", "Llama 3.1 8B Instant", "groq", "Groq"),
        FallbackModel::new("gpt-4o-mini", "GPT-4o mini", "openai", "OpenAI"),
    ]
});

pub fn builtin_fallback_models() -> Vec<FallbackModel> {
    PRESETS.clone()
}
