//!
//! src/config.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Loads environment driven configuration for the spotify client,
//! http behavior, data file locations and the logger
//!

use std::{path::PathBuf, time};
use url::Url;
use crate::errors::TrendsError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 4;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Wrapper over env::var to return an invalid enviroment var error
fn env_check(s: &str) -> Result<String, TrendsError> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TrendsError::Config(format!("{s} was not set"))),
    }
}

fn env_or(s: &str, default: &str) -> String {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string()
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

fn ensure_trailing_slash(url: &mut Url) {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_string();
        path.push('/');
        url.set_path(&path);
    }
}

/// Configuration that Spotify expects when hitting endpoints
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
}

impl SpotifyConfig {
    /// Validates both endpoints, only the secrets come from the caller
    pub fn new(
        client_id: String,
        client_secret: String,
        token_url: &str,
        api_base: &str
    ) -> Result<Self, TrendsError> {
        let token_url = Url::parse(token_url)
            .map_err(|e| TrendsError::Config(
                format!("SPOTIFY_TOKEN_URL invalid {e}")
            ))?;
        let mut api_base = Url::parse(api_base)
            .map_err(|e| TrendsError::Config(
                format!("SPOTIFY_API_BASE invalid {e}")
            ))?;

        // ensure valid https and hostname for both urls
        ensure_https(&token_url).map_err(TrendsError::Config)?;
        ensure_https(&api_base).map_err(TrendsError::Config)?;
        ensure_host(&token_url, "accounts.spotify.com")
            .map_err(TrendsError::Config)?;
        ensure_host(&api_base, "api.spotify.com")
            .map_err(TrendsError::Config)?;

        ensure_trailing_slash(&mut api_base);

        Ok( Self { client_id, client_secret, token_url, api_base } )
    }
}

/// Credentials are only required by the collector, so this is not part of
/// load_config
pub fn load_spotify() -> Result<SpotifyConfig, TrendsError> {
    dotenvy::dotenv().ok();

    let client_id     = env_check("SPOTIFY_CLIENT_ID")?;
    let client_secret = env_check("SPOTIFY_CLIENT_SECRET")?;
    let token_url = env_or("SPOTIFY_TOKEN_URL", "https://accounts.spotify.com/api/token");
    let api_base  = env_or("SPOTIFY_API_BASE", "https://api.spotify.com/v1/");

    SpotifyConfig::new(client_id, client_secret, &token_url, &api_base)
}

///
/// Configuration for Http timeouts. Lookups are attempted once, a timeout
/// counts as a miss
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Locations of the csv inputs/outputs and rendered plots
///
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub raw_charts: PathBuf,    // song,artist,date
    pub charts: PathBuf,        // enriched by the collector
    pub unemployment: PathBuf,  // year,unemployment
    pub plots_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            raw_charts: PathBuf::from("./data/charts_raw.csv"),
            charts: PathBuf::from("./data/charts.csv"),
            unemployment: PathBuf::from("./data/unemployment.csv"),
            plots_dir: PathBuf::from("./data/plots"),
        }
    }
}

fn build_data() -> DataConfig {
    let defaults = DataConfig::default();
    let path_or = |s: &str, default: PathBuf| -> PathBuf {
        match std::env::var(s) {
            Ok(v) if !v.trim().is_empty() => PathBuf::from(v),
            _ => default
        }
    };

    DataConfig {
        raw_charts: path_or("CHARTS_RAW_CSV", defaults.raw_charts),
        charts: path_or("CHARTS_CSV", defaults.charts),
        unemployment: path_or("UNEMPLOYMENT_CSV", defaults.unemployment),
        plots_dir: path_or("PLOTS_DIR", defaults.plots_dir),
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            _ => None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,chart_trends=debug,reqwest=warn".to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
            include_file_line: false,
            include_target: true,
        }
    }
}

fn build_logging() -> Result<LoggingConfig, TrendsError> {
    let mut logging = LoggingConfig::default();
    if let Ok(raw) = std::env::var("LOG_FORMAT") {
        logging.format = LogFormat::parse(&raw)
            .ok_or_else(|| TrendsError::Config(
                format!("LOG_FORMAT must be pretty or json (got {raw})")
            ))?;
    }
    Ok(logging)
}

///
/// AppConfig which holds everything except spotify credentials
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, TrendsError> {
    dotenvy::dotenv().ok();

    let http    = HttpConfig::default();
    let data    = build_data();
    let logging = build_logging()?;

    Ok( AppConfig { http, data, logging } )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spotify_config_adds_trailing_slash() -> Result<(), TrendsError> {
        let cfg = SpotifyConfig::new(
            "id".into(), "secret".into(),
            "https://accounts.spotify.com/api/token",
            "https://api.spotify.com/v1"
        )?;
        assert_eq!(cfg.api_base.as_str(), "https://api.spotify.com/v1/");
        assert_eq!(cfg.api_base.join("search").unwrap().path(), "/v1/search");
        Ok(())
    }

    #[test]
    fn spotify_config_rejects_plain_http() {
        let cfg = SpotifyConfig::new(
            "id".into(), "secret".into(),
            "http://accounts.spotify.com/api/token",
            "https://api.spotify.com/v1/"
        );
        assert!(matches!(cfg, Err(TrendsError::Config(_))));
    }

    #[test]
    fn spotify_config_rejects_foreign_host() {
        let cfg = SpotifyConfig::new(
            "id".into(), "secret".into(),
            "https://accounts.spotify.com/api/token",
            "https://example.com/v1/"
        );
        assert!(matches!(cfg, Err(TrendsError::Config(_))));
    }

    #[test]
    fn log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse(" pretty "), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("xml"), None);
    }
}
