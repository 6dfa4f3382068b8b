use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    /// Base URL of the host management API (e.g. "https://tower.lan").
    pub base_url: String,
    pub api_key: String,
    /// LAN management APIs habitually run self-signed certificates.
    #[serde(default)]
    pub verify_tls: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
    /// Per-upstream call budget; a call past this counts as failed for the cycle.
    pub upstream_timeout_secs: u64,
    /// How often to log refresh totals (real seconds).
    pub stats_log_interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: 30,
            upstream_timeout_secs: 10,
            stats_log_interval_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PublishingConfig {
    /// Max number of snapshots kept in the broadcast channel for /ws/services (slow clients may lag).
    pub broadcast_capacity: usize,
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

impl MetadataConfig {
    /// Host part of base_url. Entities on host networking have no addresses of
    /// their own, so their `[IP]` placeholder resolves to the polled host itself.
    pub fn host_address(&self) -> Option<String> {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.metadata.base_url.is_empty(),
            "metadata.base_url must be non-empty"
        );
        anyhow::ensure!(
            self.metadata.base_url.starts_with("http://")
                || self.metadata.base_url.starts_with("https://"),
            "metadata.base_url must start with http:// or https://, got {}",
            self.metadata.base_url
        );
        anyhow::ensure!(
            !self.metadata.api_key.is_empty(),
            "metadata.api_key must be non-empty"
        );
        anyhow::ensure!(
            self.refresh.interval_secs > 0,
            "refresh.interval_secs must be > 0, got {}",
            self.refresh.interval_secs
        );
        anyhow::ensure!(
            self.refresh.upstream_timeout_secs > 0,
            "refresh.upstream_timeout_secs must be > 0, got {}",
            self.refresh.upstream_timeout_secs
        );
        anyhow::ensure!(
            self.refresh.stats_log_interval_secs > 0,
            "refresh.stats_log_interval_secs must be > 0, got {}",
            self.refresh.stats_log_interval_secs
        );
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        Ok(())
    }
}
