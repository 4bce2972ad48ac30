#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::time::Duration;

use roster_core::Config;
use roster_core::ConfigOverrides;
use roster_core::config::ConfigToml;
use roster_protocol::ModelsListResponse;
use roster_protocol::RemoteModelDescriptor;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

pub const MODELS_PATH: &str = "/api/openai/v1/models";

pub fn descriptor(id: &str, owned_by: &str, active: bool) -> RemoteModelDescriptor {
    RemoteModelDescriptor::new(id, owned_by, active)
}

fn models_mock() -> wiremock::MockBuilder {
    Mock::given(method("GET")).and(path(MODELS_PATH))
}

pub async fn mount_models_once(server: &MockServer, models: Vec<RemoteModelDescriptor>) {
    mount_models_once_with_delay(server, models, Duration::ZERO).await;
}

pub async fn mount_models_once_with_delay(
    server: &MockServer,
    models: Vec<RemoteModelDescriptor>,
    delay: Duration,
) {
    models_mock()
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_json(ModelsListResponse::new(models))
                .set_delay(delay),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

pub async fn mount_models_failure(server: &MockServer, status: u16) {
    models_mock()
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Wait until the server has seen `count` requests.
pub async fn wait_for_requests(server: &MockServer, count: usize) {
    for _ in 0..200 {
        let seen = server.received_requests().await.map_or(0, |r| r.len());
        if seen >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("server never received {count} request(s)");
}

/// Config pointing at `server` as a same-origin deployment.
pub fn config_for(server: &MockServer, cfg: ConfigToml) -> Config {
    let cfg = ConfigToml {
        app_origin: Some(server.uri()),
        request_timeout_ms: Some(5_000),
        ..cfg
    };
    Config::load_from_base_config_with_overrides(
        cfg,
        ConfigOverrides::default(),
        PathBuf::from("/tmp/roster-test-home"),
    )
    .expect("valid test config")
}
