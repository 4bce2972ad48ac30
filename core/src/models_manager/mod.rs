pub mod custom_models;
pub mod exclusion;
pub mod fetcher;
pub mod manager;
pub mod model_presets;
pub mod reconcile;

pub use exclusion::ExclusionRule;
pub use exclusion::PatternExclusion;
pub use fetcher::FetchOutcome;
pub use fetcher::ModelsFetcher;
pub use fetcher::RemoteSnapshot;
pub use fetcher::fetch_remote_models;
pub use manager::ModelsManager;
pub use model_presets::FallbackModel;
pub use reconcile::DefaultSource;
pub use reconcile::ReconcileOptions;
pub use reconcile::reconcile;
