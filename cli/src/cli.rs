use clap::Parser;
use clap::ValueEnum;

#[derive(Parser, Debug)]
#[command(version, about = "List the models available to the chat model picker.")]
pub struct Cli {
    /// Origin the chat app is served from; decides which models endpoint is
    /// queried.
    #[arg(long = "origin", value_name = "URL")]
    pub origin: Option<String>,

    /// Model to flag as default, either `name` or `name@provider`.
    #[arg(long = "default-model", short = 'm')]
    pub default_model: Option<String>,

    /// Custom model segments replacing `user_custom_models` from config.toml,
    /// e.g. `-all,+gpt-4o,my-model@Local=Mine`.
    #[arg(long = "custom-models", value_name = "SPECS", allow_hyphen_values = true)]
    pub custom_models: Option<String>,

    /// Request timeout for the models endpoint, in milliseconds.
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Do not merge the built-in fallback models.
    #[arg(long = "no-fallback", default_value_t = false)]
    pub no_fallback: bool,

    /// Print the reconciled list as JSON.
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Include models that are disabled.
    #[arg(long = "all", short = 'a', default_value_t = false)]
    pub all: bool,

    /// Specifies color settings for use in the output.
    #[arg(long = "color", value_enum, default_value_t = Color::Auto)]
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Color {
    Always,
    Never,
    #[default]
    Auto,
}
