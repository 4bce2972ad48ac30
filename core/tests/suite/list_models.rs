#![allow(clippy::expect_used)]

use anyhow::Result;
use pretty_assertions::assert_eq;
use roster_core::ModelsManager;
use roster_core::config::ConfigToml;
use roster_core::models_manager::model_presets::PREFERRED_DEFAULT_MODEL;
use roster_protocol::CandidateModel;
use wiremock::MockServer;

use super::responses::config_for;
use super::responses::descriptor;
use super::responses::mount_models_failure;
use super::responses::mount_models_once;

fn names(models: &[CandidateModel]) -> Vec<&str> {
    models.iter().map(|m| m.name.as_str()).collect()
}

fn default_names(models: &[CandidateModel]) -> Vec<&str> {
    models
        .iter()
        .filter(|m| m.is_default)
        .map(|m| m.name.as_str())
        .collect()
}

#[tokio::test]
async fn lists_remote_models_without_excluded_entries() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once(
        &server,
        vec![
            descriptor("gpt-4o", "openai", true),
            descriptor("whisper-1", "openai", true),
        ],
    )
    .await;

    let manager = ModelsManager::from_config(&config_for(&server, ConfigToml::default()))?;
    manager.mount();
    manager.wait_idle().await;
    let models = manager.list_models();

    let gpt = models.iter().find(|m| m.name == "gpt-4o").expect("gpt-4o");
    assert!(gpt.available);
    assert!(!names(&models).contains(&"whisper-1"));
    assert_eq!(default_names(&models), vec![PREFERRED_DEFAULT_MODEL]);
    Ok(())
}

#[tokio::test]
async fn remote_only_catalog_matches_expected_order() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once(
        &server,
        vec![
            descriptor("gemma2-9b-it", "Google", true),
            descriptor("llama-3.3-70b-versatile", "Meta", true),
            descriptor("llama-guard-3-8b", "Meta", false),
            descriptor("mixtral-8x7b-32768", "Mistral AI", true),
        ],
    )
    .await;
    let cfg = ConfigToml {
        include_fallback_models: Some(false),
        user_custom_models: Some("my-local@Ollama=My Local".to_string()),
        ..ConfigToml::default()
    };

    let manager = ModelsManager::from_config(&config_for(&server, cfg))?;
    manager.mount();
    manager.wait_idle().await;
    let models = manager.list_models();

    assert_eq!(
        names(&models),
        vec![
            "my-local",
            "gemma2-9b-it",
            "llama-3.3-70b-versatile",
            "llama-guard-3-8b",
            "mixtral-8x7b-32768",
        ]
    );
    assert_eq!(models[0].display_name, "My Local");
    assert_eq!(default_names(&models), vec!["llama-3.3-70b-versatile"]);
    Ok(())
}

#[tokio::test]
async fn configured_default_and_overrides_apply_on_top_of_remote() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once(
        &server,
        vec![
            descriptor("gpt-4o", "openai", true),
            descriptor("gpt-4o-mini", "openai", true),
            descriptor("o1", "openai", true),
        ],
    )
    .await;
    let cfg = ConfigToml {
        include_fallback_models: Some(false),
        app_custom_models: Some("-o1".to_string()),
        user_custom_models: Some("gpt-4o=GPT-4o (team)".to_string()),
        default_model: Some("gpt-4o-mini".to_string()),
        ..ConfigToml::default()
    };

    let manager = ModelsManager::from_config(&config_for(&server, cfg))?;
    manager.mount();
    manager.wait_idle().await;
    let models = manager.list_models();

    let o1 = models.iter().find(|m| m.name == "o1").expect("o1");
    assert!(!o1.available);
    let gpt = models.iter().find(|m| m.name == "gpt-4o").expect("gpt-4o");
    assert_eq!(gpt.display_name, "GPT-4o (team)");
    assert!(gpt.available);
    assert_eq!(
        manager.default_model().map(|m| m.name),
        Some("gpt-4o-mini".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn fetch_failure_degrades_to_local_models() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_failure(&server, 500).await;
    let cfg = ConfigToml {
        user_custom_models: Some("+deepseek-chat@DeepSeek".to_string()),
        ..ConfigToml::default()
    };

    let manager = ModelsManager::from_config(&config_for(&server, cfg))?;
    manager.mount();
    manager.wait_idle().await;
    let models = manager.list_models();

    assert_eq!(
        names(&models),
        vec![
            "deepseek-chat",
            "llama-3.3-70b-versatile",
            "llama-3.1-8b-instant",
            "gpt-4o-mini",
        ]
    );
    assert_eq!(default_names(&models), vec![PREFERRED_DEFAULT_MODEL]);
    Ok(())
}

#[tokio::test]
async fn list_models_is_stable_across_calls() -> Result<()> {
    let server = MockServer::start().await;
    mount_models_once(
        &server,
        vec![
            descriptor("gpt-4o", "openai", true),
            descriptor("claude-3-5-sonnet", "anthropic", true),
        ],
    )
    .await;
    let cfg = ConfigToml {
        user_custom_models: Some("-all,+gpt-4o,extra@Local".to_string()),
        ..ConfigToml::default()
    };

    let manager = ModelsManager::from_config(&config_for(&server, cfg))?;
    manager.mount();
    manager.wait_idle().await;

    assert_eq!(manager.list_models(), manager.list_models());
    Ok(())
}
