pub mod endpoint;
pub mod error;
pub mod provider;

pub use crate::endpoint::models::ModelsClient;
pub use crate::error::ApiError;
pub use crate::provider::Provider;
pub use roster_client::HttpTransport;
pub use roster_client::ReqwestTransport;
pub use roster_client::TransportError;
