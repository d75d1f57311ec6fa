//! Application configuration.
//!
//! Values come from the process environment (optionally seeded from `.env`)
//! and are handed to constructors as plain values. Nothing here is global.

use std::{net::SocketAddr, str::FromStr, time::Duration as StdDuration};

use chrono::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: `{value}`")]
    Invalid { key: &'static str, value: String },
}

/// Argon2 cost for newly produced hashes (and for the decoy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutConfig {
    pub max_failures: u32,
    pub window: Duration,
    pub lockout_duration: Duration,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_failures: 5,
            window: Duration::minutes(15),
            lockout_duration: Duration::minutes(15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    pub max_identifier_bytes: usize,
    pub max_password_bytes: usize,
    pub hashing: HashingParams,
    pub lockout: LockoutConfig,
    /// Applied around a whole verification, never inside the comparison.
    pub verify_timeout: StdDuration,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_identifier_bytes: 254,
            max_password_bytes: 1024,
            hashing: HashingParams::default(),
            lockout: LockoutConfig::default(),
            verify_timeout: StdDuration::from_millis(5_000),
        }
    }
}

impl VerifierConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_identifier_bytes = positive(
            &lookup,
            "AUTH_MAX_IDENTIFIER_BYTES",
            defaults.max_identifier_bytes,
        )?;
        let max_password_bytes =
            positive(&lookup, "AUTH_MAX_PASSWORD_BYTES", defaults.max_password_bytes)?;

        let hashing = HashingParams {
            memory_kib: positive(
                &lookup,
                "AUTH_ARGON2_MEMORY_KIB",
                defaults.hashing.memory_kib,
            )?,
            iterations: positive(
                &lookup,
                "AUTH_ARGON2_ITERATIONS",
                defaults.hashing.iterations,
            )?,
            parallelism: positive(
                &lookup,
                "AUTH_ARGON2_PARALLELISM",
                defaults.hashing.parallelism,
            )?,
        };

        let lockout = LockoutConfig {
            max_failures: positive(
                &lookup,
                "AUTH_LOCKOUT_MAX_FAILURES",
                defaults.lockout.max_failures,
            )?,
            window: seconds(&lookup, "AUTH_LOCKOUT_WINDOW_SECS", defaults.lockout.window)?,
            lockout_duration: seconds(
                &lookup,
                "AUTH_LOCKOUT_DURATION_SECS",
                defaults.lockout.lockout_duration,
            )?,
        };

        let timeout_ms: u64 = positive(
            &lookup,
            "AUTH_VERIFY_TIMEOUT_MS",
            defaults.verify_timeout.as_millis() as u64,
        )?;

        Ok(Self {
            max_identifier_bytes,
            max_password_bytes,
            hashing,
            lockout,
            verify_timeout: StdDuration::from_millis(timeout_ms),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub verifier: VerifierConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let bind_addr = parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
        )?;
        let verifier = VerifierConfig::from_lookup(&lookup)?;

        Ok(Self {
            database_url,
            bind_addr,
            verifier,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn positive<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + Default + ToString,
{
    let value = parse_or(lookup, key, default)?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        });
    }
    Ok(value)
}

fn seconds<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs: i64 = positive(lookup, key, default.num_seconds())?;
    Duration::try_seconds(secs).ok_or(ConfigError::Invalid {
        key,
        value: secs.to_string(),
    })
}
