use anyhow::Result;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub sync: SyncConfig,
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
    pub partner: PartnerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Upper bound for one source fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Duration assigned to feed events that carry no recognizable end.
    pub default_event_duration_minutes: u32,
}

/// Shared-credential pair used by the inbound webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Status assigned to bookings created through the webhook:
    /// "confirmed" or "pending".
    pub default_status: String,
}

/// Shared-credential pair for the operator-facing endpoints
/// (manual sync trigger, source management).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartnerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Partner-side product the availability pushes apply to. Pushing is
    /// skipped entirely when unset.
    pub product_id: Option<String>,
    /// Route calls to the sandbox environment instead of production.
    pub sandbox: bool,
    pub sandbox_url: String,
    pub production_url: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8714)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default("sync.fetch_timeout_secs", 15)?
            .set_default("sync.default_event_duration_minutes", 60)?
            .set_default("webhook.default_status", "confirmed")?
            .set_default("partner.sandbox", true)?
            .set_default(
                "partner.sandbox_url",
                "https://sandbox.suppliers.example.com/api/v1",
            )?
            .set_default(
                "partner.production_url",
                "https://suppliers.example.com/api/v1",
            )?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
