use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use roster_api::HttpTransport;
use roster_api::ModelsClient;
use roster_protocol::RemoteModelDescriptor;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

/// Latest remote catalog, shared cheaply with readers.
pub type RemoteSnapshot = Arc<Vec<RemoteModelDescriptor>>;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(Vec<RemoteModelDescriptor>),
    /// The request failed; the error has already been logged.
    Failed,
    /// The token fired before the request finished.
    Cancelled,
}

/// Race one models request against `cancellation_token`.
///
/// Cancellation is not an error and is only logged at debug level.
pub async fn fetch_remote_models<T: HttpTransport>(
    client: &ModelsClient<T>,
    cancellation_token: &CancellationToken,
) -> FetchOutcome {
    tokio::select! {
        biased;
        _ = cancellation_token.cancelled() => {
            debug!("models fetch cancelled");
            FetchOutcome::Cancelled
        }
        result = client.list_models() => match result {
            Ok(models) => {
                debug!(count = models.len(), "fetched remote models");
                FetchOutcome::Loaded(models)
            }
            Err(err) => {
                warn!("failed to fetch model list: {err}");
                FetchOutcome::Failed
            }
        },
    }
}

struct ActiveFetch {
    cancellation_token: CancellationToken,
    /// Closed when the fetch task exits; every waiter holds a clone.
    done: watch::Receiver<()>,
}

struct FetcherState {
    snapshot_tx: watch::Sender<RemoteSnapshot>,
    active: Mutex<Option<ActiveFetch>>,
}

impl FetcherState {
    fn active(&self) -> MutexGuard<'_, Option<ActiveFetch>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Owns the remote snapshot and the single in-flight fetch that may update
/// it.
///
/// `mount` must be called from within a Tokio runtime.
pub struct ModelsFetcher<T: HttpTransport + 'static> {
    client: Arc<ModelsClient<T>>,
    state: Arc<FetcherState>,
}

impl<T: HttpTransport + 'static> ModelsFetcher<T> {
    pub fn new(client: ModelsClient<T>) -> Self {
        let (snapshot_tx, _) = watch::channel(RemoteSnapshot::default());
        Self {
            client: Arc::new(client),
            state: Arc::new(FetcherState {
                snapshot_tx,
                active: Mutex::new(None),
            }),
        }
    }

    /// Start a fresh fetch, cancelling any that is still running so a stale
    /// response can never overwrite a newer one.
    pub fn mount(&self) {
        let mut active = self.state.active();
        if let Some(previous) = active.take() {
            previous.cancellation_token.cancel();
        }

        let cancellation_token = CancellationToken::new();
        let task_token = cancellation_token.clone();
        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let (done_tx, done) = watch::channel(());
        tokio::spawn(async move {
            let _done_tx = done_tx;
            let FetchOutcome::Loaded(models) = fetch_remote_models(&client, &task_token).await
            else {
                return;
            };
            // Checked under the same lock `mount`/`unmount` cancel under, so a
            // cancelled fetch can never publish.
            let _active = state.active();
            if task_token.is_cancelled() {
                debug!("discarding models fetched after cancellation");
                return;
            }
            state.snapshot_tx.send_replace(Arc::new(models));
        });

        *active = Some(ActiveFetch {
            cancellation_token,
            done,
        });
    }

    /// Cancel the in-flight fetch, if any. The snapshot keeps its value.
    pub fn unmount(&self) {
        if let Some(active) = self.state.active().take() {
            active.cancellation_token.cancel();
        }
    }

    /// Wait for the most recently mounted fetch to settle. Any number of
    /// callers may wait at once.
    pub async fn wait_idle(&self) {
        let done = self
            .state
            .active()
            .as_ref()
            .map(|active| active.done.clone());
        if let Some(mut done) = done {
            // The sender never sends; `changed` errors once the task drops it.
            while done.changed().await.is_ok() {}
        }
    }

    pub fn snapshot(&self) -> RemoteSnapshot {
        Arc::clone(&self.state.snapshot_tx.borrow())
    }

    /// Receiver notified whenever a fetch publishes a new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<RemoteSnapshot> {
        self.state.snapshot_tx.subscribe()
    }
}

impl<T: HttpTransport + 'static> Drop for ModelsFetcher<T> {
    fn drop(&mut self) {
        self.unmount();
    }
}
