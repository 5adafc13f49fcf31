//! Configuration for the conversion service connection

use serde::{Deserialize, Serialize};
use std::path::Path;
use log::debug;

/// Base URL used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Environment variable overriding the base URL
pub const API_BASE_ENV: &str = "CODECONV_API_BASE_URL";

/// Environment variable overriding the request timeout
pub const TIMEOUT_ENV: &str = "CODECONV_TIMEOUT_SECS";

/// Conversion service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig
{   /// Service base URL, without the `/api/...` path
    #[serde(default = "default_api_base")]
    pub api_base: String
  , /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>
  , /// Log at debug level or finer whatever was requested
    #[serde(default)]
    pub verbose: Option<bool>
}

fn default_api_base() -> String
{   DEFAULT_API_BASE.to_string()
}

impl Default for ConverterConfig
{   fn default() -> Self
    {   ConverterConfig
        {   api_base: default_api_base()
          , timeout_secs: None
          , verbose: None
        }
    }
}

impl ConverterConfig
{   /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self, crate::error::Error>
    {   let mut config = ConverterConfig::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>)
      -> Result<Self, crate::error::Error>
    {   let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let config_str = std::fs::read_to_string(path)?;
        serde_json::from_str(&config_str).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })
    }

    /// Overlay values found through `lookup` (normally the environment).
    /// Empty values are ignored.
    pub fn apply_env<F>(
      &mut self
    , lookup: F
    ) -> Result<(), crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   if let Some(base) = lookup(API_BASE_ENV)
          .filter(|v| !v.trim().is_empty())
        {   debug!("{} set, using {}", API_BASE_ENV, base);
            self.api_base = base;
        }

        if let Some(raw) = lookup(TIMEOUT_ENV)
          .filter(|v| !v.trim().is_empty())
        {   let secs = raw.trim().parse::<u64>().map_err(|_| {
              crate::error::Error::InvalidConfiguration(
                format!("{} is not a number: {}", TIMEOUT_ENV, raw)
              )
            })?;
            self.timeout_secs = Some(secs);
        }
        Ok(())
    }

    /// Check the values before building a transport
    pub fn validate(&self) -> Result<(), crate::error::Error>
    {   let base = self.api_base.trim();
        if base.is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "api_base is empty".to_string()
            ));
        }
        if !base.starts_with("http://")
          && !base.starts_with("https://")
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!("api_base must be an http(s) URL: {}", base)
            ));
        }
        if self.timeout_secs == Some(0)
        {   return Err(crate::error::Error::InvalidConfiguration(
              "timeout_secs must be greater than zero".to_string()
            ));
        }
        Ok(())
    }

    /// Log level to use given the one asked for on the command line
    pub fn log_level(
      &self
    , requested: log::LevelFilter
    ) -> log::LevelFilter
    {   if self.verbose == Some(true)
        {   requested.max(log::LevelFilter::Debug)
        } else
        {   requested
        }
    }

    /// Full URL for an endpoint path such as `/api/text-to-code`
    pub fn endpoint_url(&self, path: &str) -> String
    {   format!("{}{}", self.api_base.trim().trim_end_matches('/'), path)
    }
}
