use http::Method;
use roster_client::Request;
use std::time::Duration;
use url::Url;

/// Hosts treated as a local development deployment.
const LOCAL_DEV_HOSTS: &[&str] = &["localhost"];

pub const DEFAULT_DEV_MODELS_URL: &str = "https://chat.songm.top/api/openai/v1/models";
pub const DEFAULT_MODELS_PATH: &str = "/api/openai/v1/models";

/// Where the models listing lives for a given deployment.
///
/// A page served from a local development host has no API behind it, so the
/// listing comes from a fixed remote deployment. Anywhere else the API is
/// same-origin and the listing path is joined onto the page origin.
#[derive(Debug, Clone)]
pub struct Provider {
    pub models_url: Url,
    pub timeout: Option<Duration>,
}

impl Provider {
    pub fn new(models_url: Url) -> Self {
        Self {
            models_url,
            timeout: None,
        }
    }

    /// Pick the models endpoint for a page served from `origin`.
    pub fn for_origin(
        origin: &Url,
        dev_models_url: &str,
        models_path: &str,
    ) -> Result<Self, url::ParseError> {
        let models_url = if is_local_dev_host(origin) {
            Url::parse(dev_models_url)?
        } else {
            origin.join(models_path)?
        };
        Ok(Self::new(models_url))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build_request(&self, method: Method) -> Request {
        let request = Request::new(method, self.models_url.to_string());
        match self.timeout {
            Some(timeout) => request.with_timeout(timeout),
            None => request,
        }
    }
}

pub fn is_local_dev_host(origin: &Url) -> bool {
    origin
        .host_str()
        .is_some_and(|host| LOCAL_DEV_HOSTS.contains(&host))
}
