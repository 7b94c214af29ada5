use std::fs::read_to_string;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://api.weatherstack.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_UNITS: &str = "m";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no api key configured for the weather provider (set WEATHER_API_KEY)")]
    MissingApiKey,
    #[error("invalid upstream base url '{url}': {message}")]
    InvalidUpstreamUrl { url: String, message: String },
    #[error("invalid frontend origin '{0}'")]
    InvalidOrigin(String),
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    #[error("both a key file and a cert file are needed for tls")]
    IncompleteTls,
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML file with provider and cors settings
    #[arg(long, env = "WEATHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Access key for the weather provider
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "WEATHER_UPSTREAM_BASE_URL")]
    pub upstream_base_url: Option<String>,

    #[arg(long, env = "WEATHER_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Unit flag passed to the provider, "m" for metric
    #[arg(long, env = "WEATHER_UNITS")]
    pub units: Option<String>,

    /// Browser origin allowed to call the api
    #[arg(long, env = "FRONTEND_ORIGIN")]
    pub frontend_origin: Option<String>,

    /// Ip to listen to
    #[arg(short, long, env = "IP", default_value = "0.0.0.0")]
    pub ip: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(short, long, env = "KEY_FILE_PATH")]
    pub key_file_path: Option<PathBuf>,

    #[arg(short, long, env = "CERT_FILE_PATH")]
    pub cert_file_path: Option<PathBuf>,
}

/// Settings that may also come from the config file.
#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub upstream_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub units: Option<String>,
    pub frontend_origin: Option<String>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct TlsFiles {
    pub key_file_path: PathBuf,
    pub cert_file_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub upstream_base_url: Url,
    pub request_timeout: Duration,
    pub units: String,
    pub frontend_origin: HeaderValue,
    pub listen_address: SocketAddr,
    pub tls: Option<TlsFiles>,
}

impl Config {
    /// Resolves the configuration. Flags and environment win over the file.
    pub fn from_args(args: Args) -> Result<Config, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::read(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    pub fn resolve(args: Args, file: FileConfig) -> Result<Config, ConfigError> {
        let api_key = args
            .api_key
            .or(file.api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let url = args
            .upstream_base_url
            .or(file.upstream_base_url)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_BASE_URL.to_string());
        let upstream_base_url =
            Url::parse(&url).map_err(|err| ConfigError::InvalidUpstreamUrl {
                message: err.to_string(),
                url,
            })?;

        let timeout_secs = args
            .request_timeout_secs
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let units = args
            .units
            .or(file.units)
            .unwrap_or_else(|| DEFAULT_UNITS.to_string());

        let origin = args
            .frontend_origin
            .or(file.frontend_origin)
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGIN.to_string());
        let frontend_origin = parse_origin(&origin)?;

        let tls = match (args.key_file_path, args.cert_file_path) {
            (Some(key_file_path), Some(cert_file_path)) => Some(TlsFiles {
                key_file_path,
                cert_file_path,
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Config {
            api_key,
            upstream_base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            units,
            frontend_origin,
            listen_address: SocketAddr::new(args.ip, args.port),
            tls,
        })
    }
}

fn parse_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    // An origin is scheme://host[:port], nothing after it.
    let invalid = || ConfigError::InvalidOrigin(origin.to_string());
    let url = Url::parse(origin).map_err(|_| invalid())?;
    if url.cannot_be_a_base() || url.host_str().is_none() || origin.ends_with('/') {
        return Err(invalid());
    }
    HeaderValue::from_str(origin).map_err(|_| invalid())
}
