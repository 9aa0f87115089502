//! Configuration Module
//!
//! Environment-driven settings for the server and the console client.

mod settings;

pub use settings::{
    AppConfig, ConfigError, DEFAULT_API_URL, DEFAULT_BIND_ADDRESS, DEFAULT_PORT, RunMode,
    ServerSettings, load_dotenv,
};
