use chrono::FixedOffset;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use crate::core::{CheckInPolicy, DEFAULT_NEARBY_RADIUS_KM};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub appwrite: AppwriteSettings,
    pub collection: CollectionSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub check_in: CheckInSettings,
    #[serde(default)]
    pub webhook: WebhookSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppwriteSettings {
    pub endpoint: String,
    pub api_key: String,
    pub project_id: String,
    pub database_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectionSettings {
    pub user_profiles: String,
    pub swipes: String,
    pub matches: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_nearby_radius_km")]
    pub nearby_radius_km: f64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            nearby_radius_km: default_nearby_radius_km(),
            page_size: default_page_size(),
        }
    }
}

fn default_nearby_radius_km() -> f64 { DEFAULT_NEARBY_RADIUS_KM }
fn default_page_size() -> usize { 100 }

#[derive(Debug, Clone, Deserialize)]
pub struct CheckInSettings {
    #[serde(default = "default_radius_meters")]
    pub radius_meters: f64,
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl Default for CheckInSettings {
    fn default() -> Self {
        Self {
            radius_meters: default_radius_meters(),
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
            utc_offset_minutes: 0,
        }
    }
}

fn default_radius_meters() -> f64 { 100.0 }
fn default_open_hour() -> u32 { 5 }
fn default_close_hour() -> u32 { 23 }

impl CheckInSettings {
    /// Build the check-in policy, rejecting offsets chrono cannot represent
    pub fn policy(&self) -> Result<CheckInPolicy, ConfigError> {
        let utc_offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            ConfigError::Message(format!(
                "check_in.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })?;

        if self.open_hour >= self.close_hour || self.close_hour > 24 {
            return Err(ConfigError::Message(format!(
                "check_in window invalid: {}..{}",
                self.open_hour, self.close_hour
            )));
        }

        Ok(CheckInPolicy {
            radius_meters: self.radius_meters,
            open_hour: self.open_hour,
            close_hour: self.close_hour,
            utc_offset,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    pub suggestions_url: Option<String>,
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            suggestions_url: None,
            timeout_secs: default_webhook_timeout(),
        }
    }
}

fn default_webhook_timeout() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SPOTTER__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SPOTTER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SPOTTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SPOTTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the unprefixed variables deployment platforms commonly set
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let overrides = [
        ("APPWRITE_ENDPOINT", "appwrite.endpoint"),
        ("APPWRITE_API_KEY", "appwrite.api_key"),
        ("APPWRITE_PROJECT_ID", "appwrite.project_id"),
        ("APPWRITE_DATABASE_ID", "appwrite.database_id"),
        ("JWT_SECRET", "auth.jwt_secret"),
        ("SUGGESTIONS_WEBHOOK_URL", "webhook.suggestions_url"),
    ];

    let mut builder = Config::builder().add_source(settings);
    for (var, key) in overrides {
        if let Ok(value) = env::var(var) {
            builder = builder.set_override(key, value)?;
        }
    }

    builder.build()
}
