// Request and response models for the notification call

use std::fmt;

use serde::{Deserialize, Serialize};

/// Replacement string written to the build log for masked header values
pub const LOG_MASK: &str = "*****";

/// The only status accepted as a successfully recorded release
pub const EXPECTED_STATUS: u16 = 200;

/// HTTP method for the notification request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Whether a request body is sent for this method
    pub fn allows_body(&self) -> bool {
        matches!(
            self,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Delete
        )
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        };
        write!(f, "{}", name)
    }
}

/// A single request header.
///
/// `mask_in_log` hides the value when the header is echoed to the build log;
/// the wire request always carries the value in clear text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
    pub mask_in_log: bool,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mask_in_log: false,
        }
    }

    /// A header whose value is masked in the build log (credentials)
    pub fn masked(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mask_in_log: true,
        }
    }

    /// The value as it appears in the build log
    pub fn log_value(&self) -> &str {
        if self.mask_in_log {
            LOG_MASK
        } else {
            &self.value
        }
    }
}

/// Immutable description of one notification call.
///
/// Carries no live connections; rebuilding one per call is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub url: String,
    pub method: HttpMethod,
    pub body: String,
    /// Ordered header list; name uniqueness is not enforced
    pub headers: Vec<Header>,
    /// host:port or a full URL; `None` means a direct connection
    pub proxy: Option<String>,
}

/// Captured result of one executed request.
///
/// The body is materialized exactly once; a capture never re-reads the
/// network. `status` is the real HTTP status, or a synthetic code standing in
/// for a normalized transport failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCapture {
    pub status: u16,
    pub content: String,
    pub content_type: Option<String>,
}

impl ResponseCapture {
    pub fn new(status: u16, content: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            status,
            content: content.into(),
            content_type,
        }
    }

    /// Capture standing in for a transport failure that produced no response
    pub fn synthetic(status: u16, content: impl Into<String>) -> Self {
        Self {
            status,
            content: content.into(),
            content_type: None,
        }
    }
}

/// Logical result of one execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure { status: u16, content: String },
}

impl Outcome {
    /// Classify a capture; only a literal 200 counts as success
    pub fn of(response: &ResponseCapture) -> Self {
        if response.status == EXPECTED_STATUS {
            Outcome::Success
        } else {
            Outcome::Failure {
                status: response.status,
                content: response.content.clone(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}
