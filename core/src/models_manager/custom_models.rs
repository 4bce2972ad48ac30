//! Locally configured model overrides.
//!
//! Settings carry models as a delimited list of segments:
//!
//! - `name` or `+name` enables (or adds) a model, `-name` disables it.
//! - `+all` / `-all` toggles every model collected so far.
//! - `name=Display Name` renames a model in the picker.
//! - `name@Provider` only touches the model as served by `Provider`; a model
//!   created this way joins that provider's group when one is already listed,
//!   otherwise a custom provider of that name.
//!
//! Segments that do not parse are skipped.

use std::collections::HashMap;

use indexmap::IndexMap;
use roster_protocol::CandidateModel;
use roster_protocol::ModelProvider;
use tracing::debug;

pub const CUSTOM_PROVIDER_TYPE: &str = "custom";

const ALL_MODELS: &str = "all";
const CUSTOM_SORT_BASE: i64 = -1000;

/// Candidates keyed by model name, in the order they were first collected.
pub(crate) type ModelTable = IndexMap<String, CandidateModel>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomModelSpec {
    /// `+all` / `-all`.
    All { available: bool },
    Model {
        name: String,
        provider: Option<String>,
        display_name: Option<String>,
        available: bool,
    },
}

/// Parse a comma- or semicolon-delimited spec string, dropping segments that
/// do not name a model.
pub fn parse_custom_models(specs: &str) -> Vec<CustomModelSpec> {
    specs
        .split([',', ';'])
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let spec = parse_segment(segment);
            if spec.is_none() {
                debug!(segment, "skipping unparsable custom model segment");
            }
            spec
        })
        .collect()
}

fn parse_segment(segment: &str) -> Option<CustomModelSpec> {
    let (available, body) = if let Some(rest) = segment.strip_prefix('-') {
        (false, rest)
    } else if let Some(rest) = segment.strip_prefix('+') {
        (true, rest)
    } else {
        (true, segment)
    };

    let (target, display_name) = match body.split_once('=') {
        Some((target, display)) => (target.trim(), Some(display.trim())),
        None => (body.trim(), None),
    };
    if target == ALL_MODELS {
        return Some(CustomModelSpec::All { available });
    }

    let (name, provider) = split_model_provider(target);
    if name.is_empty() || provider.is_some_and(str::is_empty) {
        return None;
    }

    Some(CustomModelSpec::Model {
        name: name.to_string(),
        provider: provider.map(ToString::to_string),
        display_name: display_name
            .filter(|display| !display.is_empty())
            .map(ToString::to_string),
        available,
    })
}

/// Split `model@provider` on the last `@`, so model names may contain `@`.
pub fn split_model_provider(value: &str) -> (&str, Option<&str>) {
    match value.rsplit_once('@') {
        Some((model, provider)) => (model, Some(provider)),
        None => (value, None),
    }
}

/// Hands out sort values for locally created models and providers. The same
/// key always receives the same value within one reconciliation.
#[derive(Debug)]
struct CustomSequence {
    last: i64,
    assigned: HashMap<String, i64>,
}

impl CustomSequence {
    fn new() -> Self {
        Self {
            last: CUSTOM_SORT_BASE,
            assigned: HashMap::new(),
        }
    }

    fn next(&mut self, key: &str) -> i64 {
        if let Some(value) = self.assigned.get(key) {
            return *value;
        }
        self.last += 1;
        self.assigned.insert(key.to_string(), self.last);
        self.last
    }
}

fn custom_provider(name: &str, sequence: &mut CustomSequence) -> ModelProvider {
    ModelProvider {
        id: name.to_lowercase(),
        provider_name: name.to_string(),
        provider_type: CUSTOM_PROVIDER_TYPE.to_string(),
        sorted: sequence.next(name),
    }
}

/// A provider already present in `table`, matched case-insensitively by id.
fn existing_provider(table: &ModelTable, id: &str) -> Option<ModelProvider> {
    table
        .values()
        .map(|model| &model.provider)
        .find(|provider| provider.id.eq_ignore_ascii_case(id))
        .cloned()
}

/// Layer `specs` on top of `table`. Named entries override what is already
/// present; everything else is left untouched.
pub(crate) fn apply_custom_models(table: &mut ModelTable, specs: &str) {
    let mut sequence = CustomSequence::new();

    for spec in parse_custom_models(specs) {
        match spec {
            CustomModelSpec::All { available } => {
                for model in table.values_mut() {
                    model.available = available;
                }
            }
            CustomModelSpec::Model {
                name,
                provider,
                display_name,
                available,
            } => {
                let matched = table.get_mut(&name).filter(|existing| {
                    provider
                        .as_deref()
                        .is_none_or(|provider| existing.provider.id.eq_ignore_ascii_case(provider))
                });

                if let Some(existing) = matched {
                    existing.available = available;
                    if let Some(display_name) = display_name {
                        existing.display_name = display_name;
                    }
                    continue;
                }

                let provider = match provider.as_deref() {
                    Some(provider) => existing_provider(table, provider)
                        .unwrap_or_else(|| custom_provider(provider, &mut sequence)),
                    None => custom_provider(&name, &mut sequence),
                };
                let sorted = sequence.next(&format!("{name}@{}", provider.id));
                let model = CandidateModel {
                    display_name: display_name.unwrap_or_else(|| name.clone()),
                    name: name.clone(),
                    available,
                    sorted,
                    provider,
                    is_default: false,
                };
                // A same-named model from another provider is replaced so
                // names stay unique.
                table.insert(name, model);
            }
        }
    }
}
