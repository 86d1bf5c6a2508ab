use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub pricing_file: String,

    /// Seconds between background refresh polls. 0 disables refresh.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
}

fn default_refresh_interval() -> u64 {
    5
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Then the current environment's file, which is optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Then a local file that shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Finally environment overrides, e.g. TALLY_SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
