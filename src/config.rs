use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CURRENCIES_API_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,common,currencies";

// Pinned commit for supply-chain safety
pub const DEFAULT_ISO_4217_URL: &str = "https://raw.githubusercontent.com/datasets/currency-codes/052b3088938ba32028a14e75040c286c5e142145/data/codes-all.csv";

pub const DEFAULT_WEBLATE_API_URL: &str = "https://translate.sysadminsmedia.com/api";

pub const DEFAULT_COMPLETION_THRESHOLD: f64 = 80.0;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    // Currency sources
    pub currencies_api_url: String,
    pub iso_4217_url: String,

    // Translation completion source
    pub weblate_api_url: String,
    pub weblate_project: String,
    pub weblate_component: String,
    pub completion_threshold: f64,

    // HTTP
    pub request_timeout: Duration,

    // Artifacts
    pub currencies_path: PathBuf,
    pub locales_dir: PathBuf,
    pub languages_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Currency sources (HTTPS is enforced by the fetcher, not here)
            currencies_api_url: std::env::var("CURRENCIES_API_URL")
                .unwrap_or_else(|_| DEFAULT_CURRENCIES_API_URL.to_string()),
            iso_4217_url: std::env::var("ISO_4217_URL")
                .unwrap_or_else(|_| DEFAULT_ISO_4217_URL.to_string()),

            // Weblate
            weblate_api_url: std::env::var("WEBLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_WEBLATE_API_URL.to_string()),
            weblate_project: std::env::var("WEBLATE_PROJECT")
                .unwrap_or_else(|_| "homebox".to_string()),
            weblate_component: std::env::var("WEBLATE_COMPONENT")
                .unwrap_or_else(|_| "frontend".to_string()),
            completion_threshold: std::env::var("COMPLETION_THRESHOLD")
                .ok()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(0.0, 100.0))
                .unwrap_or(DEFAULT_COMPLETION_THRESHOLD),

            // HTTP
            request_timeout: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),

            // Artifacts
            currencies_path: std::env::var("CURRENCIES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    PathBuf::from("backend/internal/core/currencies/currencies.json")
                }),
            locales_dir: std::env::var("LOCALES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("frontend/locales")),
            languages_path: std::env::var("LANGUAGES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("frontend/locales/en.json")),
        })
    }

    /// Translation statistics endpoint for the configured project/component.
    pub fn weblate_translations_url(&self) -> String {
        format!(
            "{}/components/{}/{}/translations/",
            self.weblate_api_url.trim_end_matches('/'),
            self.weblate_project,
            self.weblate_component
        )
    }
}
