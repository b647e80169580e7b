//! Environment-driven settings for servers hosting the sitemap.

use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;

use thiserror::Error;

use crate::config::SitemapSettings;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(#[from] ParseIntError),

    #[error("Invalid hostname: {0}")]
    InvalidHostname(#[from] AddrParseError),

    #[error("{name} must be a positive number, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be a boolean, got '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

/// Gets the host:port from the env vars HOST and PORT.
/// Uses defaults `127.0.0.1:3000` if env vars are empty.
pub fn server_addr() -> Result<SocketAddr, EnvConfigError> {
    server_addr_from(|name| std::env::var(name).ok())
}

/// Reads sitemap settings from `SITEMAP_*` env vars on top of the defaults.
///
/// Recognized: `SITEMAP_ENDPOINT`, `SITEMAP_MAX_PER_PAGE`, `SITEMAP_FORCE_HTTPS`,
/// `SITEMAP_LOG_REQUEST`, `SITEMAP_HOST`, `SITEMAP_EXCLUDE_TAGS` and
/// `SITEMAP_EXCLUDE_URLS` (both comma-separated).
pub fn settings_from_env() -> Result<SitemapSettings, EnvConfigError> {
    settings_from_lookup(|name| std::env::var(name).ok())
}

fn server_addr_from(lookup: impl Fn(&str) -> Option<String>) -> Result<SocketAddr, EnvConfigError> {
    let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match lookup("PORT") {
        Some(p) => p.trim().parse::<u16>()?,
        None => DEFAULT_PORT,
    };
    Ok(format!("{}:{}", host, port).parse::<SocketAddr>()?)
}

pub(crate) fn settings_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<SitemapSettings, EnvConfigError> {
    let mut settings = SitemapSettings::default();
    if let Some(endpoint) = lookup("SITEMAP_ENDPOINT") {
        settings.endpoint = endpoint.trim().to_string();
    }
    if let Some(value) = lookup("SITEMAP_MAX_PER_PAGE") {
        settings.max_per_page = parse_positive("SITEMAP_MAX_PER_PAGE", &value)?;
    }
    if let Some(value) = lookup("SITEMAP_FORCE_HTTPS") {
        settings.force_https = parse_flag("SITEMAP_FORCE_HTTPS", &value)?;
    }
    if let Some(value) = lookup("SITEMAP_LOG_REQUEST") {
        settings.log_request = parse_flag("SITEMAP_LOG_REQUEST", &value)?;
    }
    if let Some(host) = lookup("SITEMAP_HOST") {
        settings.host = Some(host.trim().to_string()).filter(|h| !h.is_empty());
    }
    if let Some(tags) = lookup("SITEMAP_EXCLUDE_TAGS") {
        settings.exclude_tags = split_list(&tags).collect();
    }
    if let Some(urls) = lookup("SITEMAP_EXCLUDE_URLS") {
        settings.exclude_urls = split_list(&urls).collect();
    }
    Ok(settings)
}

fn parse_positive(name: &'static str, value: &str) -> Result<usize, EnvConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(EnvConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, EnvConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(EnvConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
