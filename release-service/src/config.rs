// Notifier Configuration
// Global settings resolved by the orchestrator before a unit is dispatched

use crate::error::{ServiceError, ServiceResult};
use crate::release::ReleaseEvent;
use crate::request::executor::ExecutorConfig;
use crate::request::models::{Header, HttpMethod, RequestSpec};

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Path of the releases endpoint, relative to the configured base URL
pub const RELEASES_API: &str = "/api/releases";

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    30
}

/// Settings for the monitoring service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifierConfig {
    /// Base URL of the monitoring service, e.g. https://monitor.example.com
    pub base_url: String,

    /// API token sent in the Authorization header; masked in build logs
    pub api_token: String,

    /// HTTP method for the notification call
    #[serde(default)]
    pub method: HttpMethod,

    /// Optional proxy, host:port or a full URL
    #[serde(default)]
    pub proxy: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
}

impl NotifierConfig {
    /// Load and validate a YAML settings file
    pub fn from_file(path: &Path) -> ServiceResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ServiceError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| ServiceError::Config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServiceResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ServiceError::Config("base_url must not be empty".to_string()));
        }
        if self.api_token.trim().is_empty() {
            return Err(ServiceError::Config("api_token must not be empty".to_string()));
        }
        Ok(())
    }

    /// Endpoint of the releases API
    pub fn releases_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), RELEASES_API)
    }

    /// Headers every release notification carries. The token is masked when
    /// echoed to the build log but goes out in clear text on the wire.
    pub fn resolve_headers(&self) -> Vec<Header> {
        vec![
            Header::new("Content-type", "application/json"),
            Header::masked("Authorization", format!("apiToken {}", self.api_token)),
        ]
    }

    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.read_timeout_secs),
        }
    }

    /// Resolve the full request for one release event
    pub fn resolve_spec(&self, event: &ReleaseEvent, legacy_body: bool) -> ServiceResult<RequestSpec> {
        let body = if legacy_body {
            event.pipe_delimited_body()
        } else {
            event.json_body()?
        };

        Ok(RequestSpec {
            url: self.releases_url(),
            method: self.method,
            body,
            headers: self.resolve_headers(),
            proxy: self.proxy.clone().filter(|p| !p.is_empty()),
        })
    }
}
