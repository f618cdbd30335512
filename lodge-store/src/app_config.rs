use lodge_shared::Masked;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Local development endpoint, used when no backend URL is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:54321";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub local: LocalConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: Masked<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub logo_bucket: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalConfig {
    /// Where the session and preferences files live.
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    pub login_timeout_seconds: u64,
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `LODGE__BACKEND__URL=https://xyz.supabase.co`
            .add_source(config::Environment::with_prefix("LODGE").separator("__"))
            .set_override_option("backend.url", env::var("SUPABASE_URL").ok())?
            .set_override_option("backend.anon_key", env::var("SUPABASE_ANON_KEY").ok())?
            .build()?;

        s.try_deserialize()
    }

    /// Built-in values only; no files, no environment.
    pub fn with_defaults() -> Result<Self, config::ConfigError> {
        Self::defaults()?.build()?.try_deserialize()
    }

    fn defaults() -> Result<Builder, config::ConfigError> {
        config::Config::builder()
            .set_default("backend.url", DEFAULT_BACKEND_URL)?
            .set_default("backend.anon_key", "")?
            .set_default("backend.timeout_seconds", 30)?
            .set_default("storage.logo_bucket", "logos")?
            .set_default("local.data_dir", ".lodge")?
            .set_default("ui.login_timeout_seconds", 10)
    }
}
