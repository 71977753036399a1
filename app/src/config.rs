// catalog_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Tuning of the streamed product listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSettings {
  /// Extra cycles appended to the base sequence by the amplified listings.
  pub repeat_count: usize,
  /// Delay applied to every element of the paced listing.
  pub pace: Duration,
  /// Most elements the chunked listing may prepare ahead of its consumer.
  pub lookahead: usize,
}

impl Default for ListSettings {
  fn default() -> Self {
    Self {
      repeat_count: 5000,
      pace: Duration::from_secs(1),
      lookahead: 2,
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub uploads_path: PathBuf,
  pub list: ListSettings,
  pub seed_db: bool,
}

fn parse_env<T>(var_name: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  match env::var(var_name) {
    Ok(raw) => raw
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e))),
    Err(_) => Ok(default),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let defaults = ListSettings::default();
    let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = parse_env::<u16>("SERVER_PORT", 8080)?;
    let uploads_path = env::var("UPLOADS_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("./uploads"));

    let list = ListSettings {
      repeat_count: parse_env("LIST_REPEAT_COUNT", defaults.repeat_count)?,
      pace: Duration::from_millis(parse_env("LIST_PACE_MILLIS", defaults.pace.as_millis() as u64)?),
      lookahead: parse_env("LIST_LOOKAHEAD", defaults.lookahead)?,
    };
    if list.lookahead == 0 {
      return Err(AppError::Config("LIST_LOOKAHEAD must be at least 1".to_string()));
    }

    let seed_db = parse_env::<bool>("SEED_DB", true)?;

    tracing::info!("Application configuration loaded successfully.");
    tracing::debug!(?list, uploads_path = %uploads_path.display(), seed_db, "Loaded config details");

    Ok(Self {
      server_host,
      server_port,
      uploads_path,
      list,
      seed_db,
    })
  }
}
