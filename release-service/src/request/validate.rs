// Response Validation
// The single pass/fail contract for the notification call

use crate::error::{ServiceError, ServiceResult};
use crate::request::models::{Outcome, ResponseCapture};
use crate::sink::LogSink;

/// Apply the success rule: anything but a literal 200 fails the build step.
///
/// On failure the full response content is written to the log for diagnosis
/// before the fatal error is raised. Headers, content shape, and content-type
/// are not inspected.
pub fn validate(response: &ResponseCapture, sink: &dyn LogSink) -> ServiceResult<Outcome> {
    match Outcome::of(response) {
        Outcome::Success => Ok(Outcome::Success),
        Outcome::Failure { status, content } => {
            sink.append(&content)?;
            Err(ServiceError::Rejected { status })
        }
    }
}
