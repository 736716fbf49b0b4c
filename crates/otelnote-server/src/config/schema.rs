use serde::Deserialize;
use otelnote_core::error::{NoteError, Result};
use otelnote_core::note::DEFAULT_MAX_CONTENT_CHARS;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            storage: StorageSection::default(),
            telemetry: TelemetrySection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(NoteError::BadRequest(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.storage.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen
            .parse::<std::net::SocketAddr>()
            .map_err(|e| NoteError::BadRequest(format!("server.listen must be a socket address: {e}")))?;
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:5000".into()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file, used by the sqlite backend only.
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl StorageSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1_000_000).contains(&self.max_content_chars) {
            return Err(NoteError::BadRequest(
                "storage.max_content_chars must be between 1 and 1000000".into(),
            ));
        }
        if self.backend == StorageBackend::Sqlite && self.path.trim().is_empty() {
            return Err(NoteError::BadRequest(
                "storage.path must be set for the sqlite backend".into(),
            ));
        }
        Ok(())
    }
}

fn default_db_path() -> String {
    "/tmp/test.db".into()
}
fn default_max_content_chars() -> usize {
    DEFAULT_MAX_CONTENT_CHARS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Collector address, `host:port` or a full URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_true")]
    pub insecure: bool,

    #[serde(default = "default_export_interval_ms")]
    pub export_interval_ms: u64,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    #[serde(default = "default_meter_name")]
    pub meter_name: String,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            insecure: true,
            export_interval_ms: default_export_interval_ms(),
            service_name: default_service_name(),
            meter_name: default_meter_name(),
        }
    }
}

impl TelemetrySection {
    pub fn validate(&self) -> Result<()> {
        if !(1_000..=3_600_000).contains(&self.export_interval_ms) {
            return Err(NoteError::BadRequest(
                "telemetry.export_interval_ms must be between 1000 and 3600000".into(),
            ));
        }
        if self.enabled && self.endpoint.trim().is_empty() {
            return Err(NoteError::BadRequest(
                "telemetry.endpoint must not be empty when telemetry is enabled".into(),
            ));
        }
        if self.meter_name.trim().is_empty() {
            return Err(NoteError::BadRequest("telemetry.meter_name must not be empty".into()));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_endpoint() -> String {
    "localhost:4317".into()
}
fn default_export_interval_ms() -> u64 {
    60_000
}
fn default_service_name() -> String {
    "otelnote".into()
}
fn default_meter_name() -> String {
    "otelnote".into()
}
