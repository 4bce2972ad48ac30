mod cli;

pub use cli::Cli;
pub use cli::Color;

use owo_colors::OwoColorize;
use roster_core::Config;
use roster_core::ConfigOverrides;
use roster_core::ModelsManager;
use roster_protocol::CandidateModel;
use supports_color::Stream;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        origin,
        default_model,
        custom_models,
        timeout_ms,
        no_fallback,
        json,
        all,
        color,
    } = cli;

    let (stdout_with_ansi, stderr_with_ansi) = match color {
        Color::Always => (true, true),
        Color::Never => (false, false),
        Color::Auto => (
            supports_color::on_cached(Stream::Stdout).is_some(),
            supports_color::on_cached(Stream::Stderr).is_some(),
        ),
    };

    let default_level = "error";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(stderr_with_ansi)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();

    let overrides = ConfigOverrides {
        app_origin: origin,
        user_custom_models: custom_models,
        default_model,
        request_timeout_ms: timeout_ms,
        include_fallback_models: no_fallback.then_some(false),
    };
    let config = Config::load_with_overrides(overrides).await?;
    debug!(home = %config.roster_home.display(), origin = %config.app_origin, "loaded config");

    let manager = ModelsManager::from_config(&config)?;
    manager.mount();
    tokio::select! {
        _ = manager.wait_idle() => {}
        _ = tokio::signal::ctrl_c() => {
            debug!("interrupted; listing local models only");
            manager.unmount();
        }
    }

    let mut models = manager.list_models();
    if !all {
        models.retain(|model| model.available);
    }

    if json {
        let output = serde_json::to_string_pretty(&models)?;
        #[allow(clippy::print_stdout)]
        {
            println!("{output}");
        }
        return Ok(());
    }

    for line in format_model_lines(&models, stdout_with_ansi) {
        #[allow(clippy::print_stdout)]
        {
            println!("{line}");
        }
    }
    Ok(())
}

/// Render `models` grouped under their provider, in list order.
fn format_model_lines(models: &[CandidateModel], color_enabled: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_provider: Option<&str> = None;

    for model in models {
        if current_provider != Some(model.provider.id.as_str()) {
            current_provider = Some(model.provider.id.as_str());
            let header = model.provider.provider_name.as_str();
            lines.push(if color_enabled {
                header.bold().to_string()
            } else {
                header.to_string()
            });
        }

        let marker = if model.is_default { "*" } else { " " };
        let mut line = format!("  {marker} {}", model.name);
        if model.display_name != model.name {
            line.push_str(&format!(" ({})", model.display_name));
        }
        if !model.available {
            line.push_str(" [disabled]");
        }
        if color_enabled && model.is_default {
            line = line.green().to_string();
        } else if color_enabled && !model.available {
            line = line.dimmed().to_string();
        }
        lines.push(line);
    }

    lines
}
