//! Configuration management for rcurl

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CurlError, Result};
use crate::utils::StringUtils;

/// Communication methods accepted by the request builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    Delete,
    #[default]
    Get,
    Post,
    Put,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Delete => "DELETE",
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }

    /// Whether the method carries a serialized body
    pub fn sends_body(&self) -> bool {
        !matches!(self, Method::Get)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = CurlError;

    /// Method names are matched exactly, the way they travel on the wire.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DELETE" => Ok(Method::Delete),
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            other => Err(CurlError::InvalidMethod(other.to_string())),
        }
    }
}

pub const ENV_CONNECT_TIMEOUT: &str = "RCURL_CONNECT_TIMEOUT";
pub const ENV_TIMEOUT: &str = "RCURL_TIMEOUT";
pub const ENV_FOLLOW_LOCATION: &str = "RCURL_FOLLOW_LOCATION";
pub const ENV_USER_AGENT: &str = "RCURL_USER_AGENT";

/// Values the request builder puts into its default option set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurlConfig {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub return_transfer: bool,
    pub follow_location: bool,
    pub user_agent: Option<String>,
}

impl Default for CurlConfig {
    fn default() -> Self {
        CurlConfig {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(30),
            return_transfer: true,
            follow_location: false,
            user_agent: None,
        }
    }
}

impl CurlConfig {
    /// Defaults overridden by `RCURL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `RCURL_*` keys
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CurlConfig::default();

        if let Some(value) = lookup(ENV_CONNECT_TIMEOUT) {
            config.connect_timeout = StringUtils::parse_timeout(value.trim())?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            config.timeout = StringUtils::parse_timeout(value.trim())?;
        }
        if let Some(value) = lookup(ENV_FOLLOW_LOCATION) {
            config.follow_location = StringUtils::parse_flag(value.trim()).ok_or_else(|| {
                CurlError::Config(format!(
                    "Invalid value for {}: '{}'",
                    ENV_FOLLOW_LOCATION, value
                ))
            })?;
        }
        if let Some(value) = lookup(ENV_USER_AGENT) {
            if !value.is_empty() {
                config.user_agent = Some(value);
            }
        }

        Ok(config)
    }
}
