use roster_api::HttpTransport;
use roster_api::ModelsClient;
use roster_api::ReqwestTransport;
use roster_client::build_reqwest_client;
use roster_protocol::CandidateModel;
use tokio::sync::watch;

use super::fetcher::ModelsFetcher;
use super::fetcher::RemoteSnapshot;
use super::reconcile::ReconcileOptions;
use super::reconcile::reconcile;
use crate::config::Config;
use crate::config::ConfigError;

/// Ties the remote catalog fetch to the configured local models and default
/// model, producing the list the picker renders.
pub struct ModelsManager<T: HttpTransport + 'static> {
    fetcher: ModelsFetcher<T>,
    options: ReconcileOptions,
    local_custom_models: String,
    default_model: Option<String>,
}

impl ModelsManager<ReqwestTransport> {
    /// Build a manager that talks to the endpoint selected by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(build_reqwest_client(config.request_timeout)?);
        let client = ModelsClient::new(transport, config.provider()?);
        Self::new(client, config)
    }
}

impl<T: HttpTransport + 'static> ModelsManager<T> {
    pub fn new(client: ModelsClient<T>, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher: ModelsFetcher::new(client),
            options: config.reconcile_options()?,
            local_custom_models: config.local_custom_models(),
            default_model: config.default_model.clone(),
        })
    }

    /// Start fetching the remote catalog, replacing any fetch in flight.
    pub fn mount(&self) {
        self.fetcher.mount();
    }

    pub fn unmount(&self) {
        self.fetcher.unmount();
    }

    pub async fn wait_idle(&self) {
        self.fetcher.wait_idle().await;
    }

    /// Notified whenever the remote catalog changes; call
    /// [`Self::list_models`] again on each change.
    pub fn subscribe(&self) -> watch::Receiver<RemoteSnapshot> {
        self.fetcher.subscribe()
    }

    /// Reconcile the current remote snapshot with local configuration.
    /// Before the first successful fetch this is the local models alone.
    pub fn list_models(&self) -> Vec<CandidateModel> {
        let remote = self.fetcher.snapshot();
        reconcile(
            &remote,
            &self.local_custom_models,
            self.default_model.as_deref(),
            &self.options,
        )
    }

    /// The model flagged as default in [`Self::list_models`], if any.
    pub fn default_model(&self) -> Option<CandidateModel> {
        self.list_models().into_iter().find(|model| model.is_default)
    }
}
