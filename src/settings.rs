use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the SQLite database file, created when missing.
    pub db_path: String,
    pub host: String,
    pub port: u16,
    /// Makes quiz picks reproducible when set.
    pub random_seed: Option<u64>,
}

impl Settings {
    /// Reads `.env` and the process environment (`DB_PATH`, `HOST`, `PORT`, `RANDOM_SEED`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_environment(Environment::default())
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
