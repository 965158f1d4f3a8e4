use std::env;

/// Which backend holds the issue collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Store
    pub store: StoreBackend,
    pub mongodb_url: Option<String>,
    pub mongodb_database: String,
    pub mongodb_collection: String,

    // Logging
    pub log_json: bool,

    // Server
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if exists

        let store = match env::var("ISSUE_STORE")
            .unwrap_or_else(|_| "mongo".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "mongo" | "mongodb" => StoreBackend::Mongo,
            "memory" => StoreBackend::Memory,
            _ => return Err(ConfigError::Invalid("ISSUE_STORE")),
        };

        // MONGO_URI is the name the original deployment used
        let mongodb_url = env::var("MONGODB_URL")
            .or_else(|_| env::var("MONGO_URI"))
            .ok();
        if store == StoreBackend::Mongo && mongodb_url.is_none() {
            return Err(ConfigError::Missing("MONGODB_URL"));
        }

        let log_json = match env::var("LOG_FORMAT")
            .unwrap_or_else(|_| "pretty".to_string())
            .as_str()
        {
            "pretty" => false,
            "json" => true,
            _ => return Err(ConfigError::Invalid("LOG_FORMAT")),
        };

        Ok(Self {
            // Store
            store,
            mongodb_url,
            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "issue_tracker".to_string()),
            mongodb_collection: env::var("MONGODB_COLLECTION")
                .unwrap_or_else(|_| "issues".to_string()),

            log_json,

            // Server
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
        })
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid environment variable: {0}")]
    Invalid(&'static str),
}
