//! Order Desk Settings
//!
//! Configuration types loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default listen address.
pub const DEFAULT_BIND_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default server URL for the console client.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A variable is set but empty.
    #[error("Empty value for environment variable: {0}")]
    EmptyValue(&'static str),
}

/// Deployment mode, selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Human-readable logs.
    #[default]
    Development,
    /// JSON logs.
    Production,
}

impl RunMode {
    /// Parse a mode name. Anything other than `production`/`prod` is development.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Check if this is production.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Get the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Listen address settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerSettings {
    /// Address to bind.
    pub bind_address: IpAddr,
    /// Port to bind.
    pub port: u16,
}

impl ServerSettings {
    /// Socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            port: DEFAULT_PORT,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Run mode.
    pub run_mode: RunMode,
    /// Server listen settings.
    pub server: ServerSettings,
    /// Base URL the console client talks to.
    pub api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::default(),
            server: ServerSettings::default(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Create configuration from environment variables.
    ///
    /// Unset variables take their defaults; set but malformed ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let run_mode = lookup("ORDER_DESK_ENV")
            .map(|s| RunMode::from_str_case_insensitive(&s))
            .unwrap_or_default();

        let server = ServerSettings {
            bind_address: parse_var(&lookup, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS)?,
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
        };

        let api_url = match lookup("ORDER_DESK_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(ConfigError::EmptyValue("ORDER_DESK_URL"));
            }
            Some(url) => url.trim().to_string(),
            None => DEFAULT_API_URL.to_string(),
        };

        Ok(Self {
            run_mode,
            server,
            api_url,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}

/// Load `.env` from the current directory or the nearest ancestor that has one.
pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
