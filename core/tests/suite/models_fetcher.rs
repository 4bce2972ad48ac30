#![allow(clippy::expect_used)]

use std::time::Duration;

use anyhow::Result;
use pretty_assertions::assert_eq;
use roster_api::ModelsClient;
use roster_api::ReqwestTransport;
use roster_core::config::ConfigToml;
use roster_core::models_manager::ModelsFetcher;
use tracing_test::traced_test;
use wiremock::MockServer;

use super::responses::config_for;
use super::responses::descriptor;
use super::responses::mount_models_failure;
use super::responses::mount_models_once;
use super::responses::mount_models_once_with_delay;
use super::responses::wait_for_requests;

const FETCH_FAILED_LOG: &str = "failed to fetch model list";

fn fetcher_for(server: &MockServer) -> ModelsFetcher<ReqwestTransport> {
    let config = config_for(server, ConfigToml::default());
    let transport = ReqwestTransport::new(reqwest::Client::new());
    let provider = config.provider().expect("provider");
    ModelsFetcher::new(ModelsClient::new(transport, provider))
}

#[tokio::test]
async fn mount_issues_exactly_one_request() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once(&server, vec![descriptor("gpt-4o", "openai", true)]).await;

    let fetcher = fetcher_for(&server);
    let mut rx = fetcher.subscribe();
    fetcher.mount();
    rx.changed().await?;

    assert_eq!(*fetcher.snapshot(), vec![descriptor("gpt-4o", "openai", true)]);
    fetcher.wait_idle().await;
    let received = server.received_requests().await.expect("requests");
    assert_eq!(received.len(), 1);
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn failure_is_logged_and_snapshot_kept() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once(&server, vec![descriptor("gpt-4o", "openai", true)]).await;
    mount_models_failure(&server, 502).await;

    let fetcher = fetcher_for(&server);
    fetcher.mount();
    fetcher.wait_idle().await;
    fetcher.mount();
    fetcher.wait_idle().await;

    assert_eq!(*fetcher.snapshot(), vec![descriptor("gpt-4o", "openai", true)]);
    assert!(logs_contain(FETCH_FAILED_LOG));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn unmount_before_response_is_silent() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once_with_delay(
        &server,
        vec![descriptor("gpt-4o", "openai", true)],
        Duration::from_secs(2),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let rx = fetcher.subscribe();
    fetcher.mount();
    wait_for_requests(&server, 1).await;
    fetcher.unmount();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!rx.has_changed()?);
    assert!(fetcher.snapshot().is_empty());
    assert!(!logs_contain(FETCH_FAILED_LOG));
    Ok(())
}

#[tokio::test]
async fn remount_discards_stale_response() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once_with_delay(
        &server,
        vec![descriptor("stale-model", "openai", true)],
        Duration::from_millis(500),
    )
    .await;
    mount_models_once(&server, vec![descriptor("fresh-model", "openai", true)]).await;

    let fetcher = fetcher_for(&server);
    fetcher.mount();
    wait_for_requests(&server, 1).await;
    fetcher.mount();
    fetcher.wait_idle().await;
    assert_eq!(*fetcher.snapshot(), vec![descriptor("fresh-model", "openai", true)]);

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(*fetcher.snapshot(), vec![descriptor("fresh-model", "openai", true)]);
    Ok(())
}

#[tokio::test]
async fn dropping_fetcher_cancels_in_flight_fetch() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once_with_delay(
        &server,
        vec![descriptor("gpt-4o", "openai", true)],
        Duration::from_millis(300),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let mut rx = fetcher.subscribe();
    fetcher.mount();
    wait_for_requests(&server, 1).await;
    drop(fetcher);

    // The sender goes away with the task; no value is ever published.
    let changed = tokio::time::timeout(Duration::from_secs(2), rx.changed()).await?;
    assert!(changed.is_err());
    Ok(())
}
