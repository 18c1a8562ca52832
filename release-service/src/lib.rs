// Release Service Library
// Builds, dispatches, and validates the monitoring API call for a release

pub mod config;
pub mod error;
pub mod grpc;
pub mod release;
pub mod request;
pub mod sink;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};

// Re-export configuration types
pub use config::{NotifierConfig, RELEASES_API};

// Re-export release payload types
pub use release::{ReleaseEvent, ReleasePayload};

// Re-export request types
pub use request::executor::{ExecutorConfig, HttpExecutor};
pub use request::models::{
    Header, HttpMethod, Outcome, RequestSpec, ResponseCapture, EXPECTED_STATUS, LOG_MASK,
};
pub use request::unit::ExecutionUnit;
pub use request::validate::validate;

// Re-export sink types
pub use sink::{log_channel, ChannelSink, FileSink, LogReceiver, LogSender, LogSink};
