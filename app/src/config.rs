use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use validator::Validate;

lazy_static::lazy_static! {
    pub static ref PROJECT_NAME: String = String::from("JobPortal").to_uppercase();
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Get the data directory for the application
pub fn get_data_dir() -> PathBuf {
    let project_name = PROJECT_NAME.clone().to_lowercase();

    if let Ok(data_dir) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(data_dir).join(&project_name)
    } else if let Ok(home_dir) = std::env::var("HOME") {
        PathBuf::from(home_dir)
            .join(".local")
            .join("share")
            .join(&project_name)
    } else {
        // Fallback to current directory if no home directory is found
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(&project_name)
    }
}

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone, Validate)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    #[validate(range(min = 1, max = 60_000))]
    pub submit_delay_ms: u64,
    #[validate(range(min = 1, max = 60_000))]
    pub redirect_delay_ms: u64,
    #[validate(range(min = 60, max = 86_400))]
    pub session_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            submit_delay_ms: 2000,
            redirect_delay_ms: 2500,
            session_ttl_secs: 1800,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let defaults = Self::default();
        let config = Self {
            bind_addr: env_or("BIND_ADDR", defaults.bind_addr)?,
            submit_delay_ms: env_or("SUBMIT_DELAY_MS", defaults.submit_delay_ms)?,
            redirect_delay_ms: env_or("REDIRECT_DELAY_MS", defaults.redirect_delay_ms)?,
            session_ttl_secs: env_or("SESSION_TTL_SECS", defaults.session_ttl_secs)?,
        };
        config
            .validate()
            .wrap_err("Invalid application configuration")?;
        Ok(config)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn env_key(name: &str) -> String {
    format!("{}_{name}", PROJECT_NAME.as_str())
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let key = env_key(name);
    match std::env::var(&key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Could not parse {key}={raw}")),
        Err(_) => Ok(default),
    }
}
