use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use roster_protocol::CandidateModel;
use roster_protocol::ModelProvider;
use roster_protocol::RemoteModelDescriptor;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::custom_models::ModelTable;
use super::custom_models::apply_custom_models;
use super::custom_models::split_model_provider;
use super::exclusion::DEFAULT_EXCLUDE_PATTERNS;
use super::exclusion::ExclusionRule;
use super::exclusion::PatternExclusion;
use super::model_presets::FallbackModel;
use super::model_presets::PREFERRED_DEFAULT_MODEL;
use super::model_presets::builtin_fallback_models;

const MODEL_SORT_BASE: i64 = 1000;
const PROVIDER_SORT_BASE: i64 = 1;

/// Which default wins when both a configured default and the preferred
/// fallback are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSource {
    /// The configured default model, then the preferred fallback.
    #[default]
    ConfiguredFirst,
    /// The preferred fallback when present in the catalog, then the
    /// configured default.
    PreferredFirst,
}

/// Deployment-specific knobs for [`reconcile`].
#[derive(Clone)]
pub struct ReconcileOptions {
    pub exclusion: Arc<dyn ExclusionRule>,
    pub fallback_models: Vec<FallbackModel>,
    pub preferred_default: Option<String>,
    pub default_source: DefaultSource,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            exclusion: Arc::new(
                PatternExclusion::new(DEFAULT_EXCLUDE_PATTERNS).unwrap_or_default(),
            ),
            fallback_models: builtin_fallback_models(),
            preferred_default: Some(PREFERRED_DEFAULT_MODEL.to_string()),
            default_source: DefaultSource::default(),
        }
    }
}

impl ReconcileOptions {
    /// Remote catalog and local specs only: nothing excluded, no fallbacks.
    pub fn remote_only() -> Self {
        Self {
            exclusion: Arc::new(PatternExclusion::none()),
            fallback_models: Vec::new(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ReconcileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconcileOptions")
            .field("fallback_models", &self.fallback_models)
            .field("preferred_default", &self.preferred_default)
            .field("default_source", &self.default_source)
            .finish_non_exhaustive()
    }
}

/// Monotonic sort values for models plus one value per provider, assigned
/// the first time the provider is seen so its models group together.
#[derive(Debug)]
struct SortCounters {
    next_model: i64,
    next_provider: i64,
    providers: HashMap<String, i64>,
}

impl SortCounters {
    fn new() -> Self {
        Self {
            next_model: MODEL_SORT_BASE,
            next_provider: PROVIDER_SORT_BASE,
            providers: HashMap::new(),
        }
    }

    fn model(&mut self) -> i64 {
        let sorted = self.next_model;
        self.next_model += 1;
        sorted
    }

    fn provider(&mut self, id: &str) -> i64 {
        if let Some(sorted) = self.providers.get(id) {
            return *sorted;
        }
        let sorted = self.next_provider;
        self.next_provider += 1;
        self.providers.insert(id.to_string(), sorted);
        sorted
    }
}

/// Merge the remote catalog, fallback presets and locally configured specs
/// into the ordered picker list.
///
/// Pure: equal inputs always yield equal output. Names in the result are
/// unique and at most one entry has `is_default` set.
pub fn reconcile(
    remote: &[RemoteModelDescriptor],
    local_specs: &str,
    default_model: Option<&str>,
    options: &ReconcileOptions,
) -> Vec<CandidateModel> {
    let mut counters = SortCounters::new();
    let mut table = ModelTable::new();

    for descriptor in remote {
        let name = descriptor.id.trim();
        if name.is_empty() {
            debug!(owned_by = %descriptor.owned_by, "skipping remote model without an id");
            continue;
        }
        if options.exclusion.excludes(descriptor) {
            continue;
        }
        let provider = ModelProvider {
            id: descriptor.owned_by.clone(),
            provider_name: descriptor.owned_by.clone(),
            provider_type: descriptor.owned_by.clone(),
            sorted: counters.provider(&descriptor.owned_by),
        };
        table.insert(
            name.to_string(),
            CandidateModel {
                name: name.to_string(),
                display_name: name.to_string(),
                available: descriptor.active,
                sorted: counters.model(),
                provider,
                is_default: false,
            },
        );
    }

    for fallback in &options.fallback_models {
        if fallback.name.is_empty() || options.exclusion.excludes(&fallback.descriptor()) {
            continue;
        }
        let provider = fallback.provider(counters.provider(&fallback.provider_id));
        table.insert(
            fallback.name.clone(),
            CandidateModel {
                name: fallback.name.clone(),
                display_name: fallback.display_name.clone(),
                available: fallback.available,
                sorted: counters.model(),
                provider,
                is_default: false,
            },
        );
    }

    let default_model = resolve_default_model(&table, default_model, options);

    apply_custom_models(&mut table, local_specs);

    let mut models: Vec<CandidateModel> = table.into_values().collect();
    if let Some(default_model) = default_model {
        mark_default(&mut models, &default_model);
    }
    models.sort_by_key(|model| (model.provider.sorted, model.sorted));
    models
}

fn resolve_default_model(
    table: &ModelTable,
    configured: Option<&str>,
    options: &ReconcileOptions,
) -> Option<String> {
    let configured = configured
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string);
    let preferred = || {
        options
            .preferred_default
            .as_deref()
            .filter(|name| table.contains_key(*name))
            .map(ToString::to_string)
    };

    match options.default_source {
        DefaultSource::ConfiguredFirst => configured.or_else(preferred),
        DefaultSource::PreferredFirst => preferred().or(configured),
    }
}

/// Flag the first available entry matching `default_model`, which is either
/// a bare model name or `model@provider`.
fn mark_default(models: &mut [CandidateModel], default_model: &str) {
    let (name, provider) = if default_model.contains('@') {
        split_model_provider(default_model)
    } else {
        (default_model, None)
    };

    let target = models.iter_mut().find(|model| {
        model.available
            && model.name == name
            && provider.is_none_or(|provider| model.provider.id.eq_ignore_ascii_case(provider))
    });
    match target {
        Some(model) => model.is_default = true,
        None => debug!(default_model, "default model is not among available models"),
    }
}
