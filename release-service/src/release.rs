// Release Event Payloads
// The two body shapes accepted by the releases API

use crate::error::{ServiceError, ServiceResult};

use serde::{Deserialize, Serialize};

/// A software release reported to the monitoring service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvent {
    pub name: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl ReleaseEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    /// Legacy freestyle-job body: fields joined with " | ", absent
    /// timestamps rendered as empty fields.
    pub fn pipe_delimited_body(&self) -> String {
        format!(
            "{} | {} | {}",
            self.name,
            self.start.as_deref().unwrap_or(""),
            self.end.as_deref().unwrap_or("")
        )
    }

    /// Structured body: name and start timestamp only, end omitted
    pub fn json_body(&self) -> ServiceResult<String> {
        let payload = ReleasePayload {
            name: self.name.clone(),
            start: self.start.clone().unwrap_or_default(),
        };
        serde_json::to_string(&payload)
            .map_err(|e| ServiceError::Execution(format!("failed to encode release payload: {}", e)))
    }
}

/// Wire form of the structured release body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleasePayload {
    pub name: String,
    pub start: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_delimited_body() {
        let event = ReleaseEvent::new("v2.0.0").with_start("100").with_end("200");
        assert_eq!(event.pipe_delimited_body(), "v2.0.0 | 100 | 200");
    }

    #[test]
    fn test_pipe_delimited_body_with_absent_timestamps() {
        let event = ReleaseEvent::new("v2.0.0");
        assert_eq!(event.pipe_delimited_body(), "v2.0.0 |  | ");
    }

    #[test]
    fn test_json_body_omits_end() {
        let event = ReleaseEvent::new("v1.2.3")
            .with_start("2024-01-01T00:00:00Z")
            .with_end("2024-01-01T01:00:00Z");

        let body = event.json_body().unwrap();
        assert!(!body.contains("end"));

        let payload: ReleasePayload = serde_json::from_str(&body).unwrap();
        assert_eq!(payload.name, "v1.2.3");
        assert_eq!(payload.start, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_json_body_round_trip() {
        let event = ReleaseEvent::new("v1.2.3").with_start("2024-01-01T00:00:00Z");
        let body = event.json_body().unwrap();

        let payload: ReleasePayload = serde_json::from_str(&body).unwrap();
        assert_eq!(
            payload,
            ReleasePayload {
                name: "v1.2.3".to_string(),
                start: "2024-01-01T00:00:00Z".to_string(),
            }
        );
    }
}
