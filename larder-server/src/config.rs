use clap::Parser;

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_UPSTREAM: &str = "https://generativelanguage.googleapis.com";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Generation proxy: keeps the model service credential on the server
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// The address and optionally port to bind to
    #[clap(long, default_value = "0.0.0.0:3000")]
    pub address: String,

    /// Base URL of the model service
    #[clap(long, default_value = DEFAULT_UPSTREAM)]
    pub upstream: String,

    /// Model used when a request does not name one
    #[clap(long, default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Write JSON logs to a daily file in this directory instead of stdout
    #[clap(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Clone)]
pub struct Config {
    pub address: String,
    pub upstream: String,
    pub default_model: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("upstream", &self.upstream)
            .field("default_model", &self.default_model)
            .field("api_key", &self.api_key.is_some())
            .finish()
    }
}

impl Config {
    /// Combine command line flags with the credential from the environment (or `.env`).
    pub fn load(args: &Args) -> Self {
        let api_key = dotenvy::var(API_KEY_VAR).ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("{API_KEY_VAR} is not set; the model service will reject requests");
        }
        Self::with_api_key(args, api_key)
    }

    pub fn with_api_key(args: &Args, api_key: Option<String>) -> Self {
        Self {
            address: args.address.clone(),
            upstream: args.upstream.clone(),
            default_model: args.default_model.clone(),
            api_key,
        }
    }
}
