use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the booking and tour routes are nested under, e.g. `/api`
    pub api_prefix: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub bookings_file: PathBuf,
    /// Pending commands the writer task will buffer before callers wait
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    pub min_lead_days: i64,
    pub max_participants: u32,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("server.api_prefix", "/api")?
            .set_default("storage.bookings_file", "data/bookings.json")?
            .set_default("storage.queue_capacity", 64_i64)?
            .set_default("booking.min_lead_days", 7_i64)?
            .set_default("booking.max_participants", 12_i64)?
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `TATRA_SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("TATRA").prefix_separator("_").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
