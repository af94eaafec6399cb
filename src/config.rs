// src/config.rs

use std::fmt;
use std::time::Duration;

use crate::engine::status::DisplayLocale;
use crate::error::AllocationError;

pub const DEFAULT_POLL_SECS: u64 = 30;
pub const MAX_POLL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_base: String,
    pub api_token: Option<String>,
    pub officer_id: i64,
    pub officer_emp_id: Option<String>,
    /// Set when a manager is looking at another officer's targets.
    pub view_officer_id: Option<i64>,
    pub locale: DisplayLocale,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub port: u16,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_base", &self.api_base)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("officer_id", &self.officer_id)
            .field("officer_emp_id", &self.officer_emp_id)
            .field("view_officer_id", &self.view_officer_id)
            .field("locale", &self.locale)
            .field("poll_interval", &self.poll_interval)
            .field("request_timeout", &self.request_timeout)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AllocationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AllocationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let api_base = get("ALLOCATION_API_BASE").ok_or_else(|| {
            AllocationError::Configuration("ALLOCATION_API_BASE must be set".into())
        })?;

        let officer_id = get("ALLOCATION_OFFICER_ID")
            .ok_or_else(|| {
                AllocationError::Configuration("ALLOCATION_OFFICER_ID must be set".into())
            })
            .and_then(|v| parse_num::<i64>("ALLOCATION_OFFICER_ID", &v))?;

        let view_officer_id = get("ALLOCATION_VIEW_OFFICER_ID")
            .map(|v| parse_num::<i64>("ALLOCATION_VIEW_OFFICER_ID", &v))
            .transpose()?;

        let locale = match get("ALLOCATION_LOCALE") {
            Some(code) => DisplayLocale::from_code(&code).ok_or_else(|| {
                AllocationError::Configuration(format!(
                    "ALLOCATION_LOCALE `{code}` is not one of en, si, ta"
                ))
            })?,
            None => DisplayLocale::English,
        };

        let poll_secs = get("ALLOCATION_POLL_SECS")
            .map(|v| parse_num::<u64>("ALLOCATION_POLL_SECS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_POLL_SECS)
            .clamp(1, MAX_POLL_SECS);

        let timeout_secs = get("ALLOCATION_REQUEST_TIMEOUT_SECS")
            .map(|v| parse_num::<u64>("ALLOCATION_REQUEST_TIMEOUT_SECS", &v))
            .transpose()?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
            .max(1);

        let port = get("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            api_base,
            api_token: get("ALLOCATION_API_TOKEN"),
            officer_id,
            officer_emp_id: get("ALLOCATION_OFFICER_EMP_ID"),
            view_officer_id,
            locale,
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            port,
        })
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AllocationError>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| AllocationError::Configuration(format!("{key} `{raw}` is invalid: {e}")))
}
