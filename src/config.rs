//! Startup configuration.
//!
//! Command line flags win over environment variables, which win over the
//! built-in defaults. The resolved [`Config`] is handed to the app before the
//! terminal program starts.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::api::DEFAULT_BASE_URL;
use crate::debounce::DEFAULT_WINDOW;
use crate::error::ConfigError;
use crate::settings::FileBackend;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "maillog-browser",
    version,
    about = "Browse mail delivery logs in the terminal",
    long_about = "Browse, search and page through mail delivery log records served by a paginated query endpoint.\n\nExamples:\n  maillog-browser\n  maillog-browser --url https://logs.example.com/api/emails\n  MAILLOG_DEBOUNCE_MS=500 maillog-browser"
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "url",
        env = "MAILLOG_URL",
        value_name = "URL",
        default_value = DEFAULT_BASE_URL,
        help = "Query endpoint returning paginated mail log records."
    )]
    pub url: String,

    #[arg(
        long = "debounce-ms",
        env = "MAILLOG_DEBOUNCE_MS",
        value_name = "MS",
        help = "Quiet period after the last filter edit before refetching (default 1000)."
    )]
    pub debounce_ms: Option<u64>,

    #[arg(
        long = "timeout",
        env = "MAILLOG_TIMEOUT",
        value_name = "SECONDS",
        default_value_t = 10,
        help = "HTTP request timeout."
    )]
    pub timeout: u64,

    #[arg(
        long = "settings",
        env = "MAILLOG_SETTINGS",
        value_name = "FILE",
        help = "Where the page size preference is stored."
    )]
    pub settings: Option<PathBuf>,

    #[arg(
        long = "no-persist",
        help = "Keep preferences in memory only."
    )]
    pub no_persist: bool,

    #[arg(
        long = "log-file",
        value_name = "FILE",
        help = "Log destination; the terminal is reserved for the interface."
    )]
    pub log_file: Option<PathBuf>,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: Url,
    pub debounce: Duration,
    pub timeout: Duration,
    /// `None` keeps settings in memory.
    pub settings_path: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default URL is valid"),
            debounce: DEFAULT_WINDOW,
            timeout: Duration::from_secs(10),
            settings_path: Some(FileBackend::default_path()),
            log_file: default_log_file(),
        }
    }
}

fn default_log_file() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("maillog-browser.log")
}

impl Config {
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&args.url).map_err(|source| ConfigError::InvalidUrl {
            url: args.url.clone(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: base_url.scheme().to_string(),
            });
        }

        let debounce = match args.debounce_ms {
            Some(0) => return Err(ConfigError::ZeroDebounce),
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_WINDOW,
        };

        let settings_path = if args.no_persist {
            None
        } else {
            Some(
                args.settings
                    .clone()
                    .unwrap_or_else(FileBackend::default_path),
            )
        };

        Ok(Self {
            base_url,
            debounce,
            timeout: Duration::from_secs(args.timeout.max(1)),
            settings_path,
            log_file: args.log_file.clone().unwrap_or_else(default_log_file),
        })
    }
}
