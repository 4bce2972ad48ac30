use crate::error::ApiError;
use crate::provider::Provider;
use http::Method;
use roster_client::HttpTransport;
use roster_protocol::ModelsListResponse;
use roster_protocol::RemoteModelDescriptor;

pub struct ModelsClient<T: HttpTransport> {
    transport: T,
    provider: Provider,
}

impl<T: HttpTransport> ModelsClient<T> {
    pub fn new(transport: T, provider: Provider) -> Self {
        Self {
            transport,
            provider,
        }
    }

    pub async fn list_models(&self) -> Result<Vec<RemoteModelDescriptor>, ApiError> {
        let req = self.provider.build_request(Method::GET);
        let resp = self.transport.execute(req).await?;

        let ModelsListResponse { data, .. } =
            serde_json::from_slice::<ModelsListResponse>(&resp.body).map_err(|e| {
                ApiError::Decode(format!(
                    "{e}; body: {}",
                    String::from_utf8_lossy(&resp.body)
                ))
            })?;

        Ok(data)
    }
}
