//! Types shared between the roster fetcher, reconciler, and its consumers.

pub mod models;

pub use models::CandidateModel;
pub use models::ModelProvider;
pub use models::ModelsListResponse;
pub use models::RemoteModelDescriptor;
