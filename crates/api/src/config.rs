/// Server configuration loaded from environment variables.
///
/// All fields except the Replicate API key have defaults suitable for
/// local development. The key is required: the process refuses to start
/// without a credential for the image generator.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5001`).
    pub port: u16,
    /// SQLite connection URL (default: `sqlite://data/gens.db?mode=rwc`).
    pub database_url: String,
    /// Root directory for generated artifacts (default: `data`).
    /// Images land under `<data_dir>/gens`.
    pub data_dir: String,
    /// Replicate API credential. Required.
    pub replicate_api_key: String,
    /// Replicate API root (default: `https://api.replicate.com`).
    /// Overridable so tests can point at a stub.
    pub replicate_api_url: String,
    /// Number of background generation workers (default: `4`).
    pub generation_workers: usize,
    /// Capacity of the generation job queue (default: `32`).
    pub generation_queue_capacity: usize,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                          |
    /// |------------------------------|----------------------------------|
    /// | `HOST`                       | `0.0.0.0`                        |
    /// | `PORT`                       | `5001`                           |
    /// | `DATABASE_URL`               | `sqlite://data/gens.db?mode=rwc` |
    /// | `DATA_DIR`                   | `data`                           |
    /// | `REPLICATE_API_KEY`          | — (required)                     |
    /// | `REPLICATE_API_URL`          | `https://api.replicate.com`      |
    /// | `GENERATION_WORKERS`         | `4`                              |
    /// | `GENERATION_QUEUE_CAPACITY`  | `32`                             |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                             |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/gens.db?mode=rwc".into());

        let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".into());

        let replicate_api_key =
            std::env::var("REPLICATE_API_KEY").expect("REPLICATE_API_KEY must be set");

        let replicate_api_url = std::env::var("REPLICATE_API_URL")
            .unwrap_or_else(|_| "https://api.replicate.com".into());

        let generation_workers: usize = std::env::var("GENERATION_WORKERS")
            .unwrap_or_else(|_| "4".into())
            .parse()
            .expect("GENERATION_WORKERS must be a valid usize");

        let generation_queue_capacity: usize = std::env::var("GENERATION_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "32".into())
            .parse()
            .expect("GENERATION_QUEUE_CAPACITY must be a valid usize");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            database_url,
            data_dir,
            replicate_api_key,
            replicate_api_url,
            generation_workers,
            generation_queue_capacity,
            request_timeout_secs,
        }
    }

    /// Folder new generations write their images to.
    pub fn gens_folder(&self) -> String {
        magicgen_core::generation::gens_folder(&self.data_dir)
    }
}
