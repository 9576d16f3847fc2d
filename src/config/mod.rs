use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the service
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Database connection URL, e.g. `sqlite://clients.db`
    pub database_url: String,
    /// HTTP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Upper bound of the connection pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Create the tables on startup when they are missing
    #[serde(default)]
    pub init_schema: bool,
}

fn default_port() -> u16 {
    5000
}

fn default_max_connections() -> u32 {
    5
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    /// Get a direct reference to the database URL
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    let config = Config::load()?;

    Ok(config)
}
