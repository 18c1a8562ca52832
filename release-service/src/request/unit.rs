// Execution Unit
// Single-use orchestration of one notification call on the worker

use crate::error::ServiceResult;
use crate::request::executor::{ExecutorConfig, HttpExecutor};
use crate::request::models::{RequestSpec, ResponseCapture};
use crate::request::validate::validate;
use crate::sink::LogSink;

/// One dispatchable notification call.
///
/// A unit is built per invocation, performs exactly one network attempt, and
/// is consumed by [`run`](ExecutionUnit::run) - it cannot be re-entered. The
/// run logs the outgoing request (masking credential headers), executes it,
/// validates the result, and hands the capture back to the caller.
pub struct ExecutionUnit {
    spec: RequestSpec,
    executor: HttpExecutor,
}

impl ExecutionUnit {
    pub fn new(spec: RequestSpec, config: ExecutorConfig) -> Self {
        Self {
            spec,
            executor: HttpExecutor::new(config),
        }
    }

    /// Log intent, execute, validate; fatal if the response is rejected.
    pub async fn run(self, sink: &dyn LogSink) -> ServiceResult<ResponseCapture> {
        sink.append(&self.spec.body)?;
        for header in &self.spec.headers {
            sink.append(&format!("{}: {}", header.name, header.log_value()))?;
        }

        let response = self.executor.execute(&self.spec, sink).await?;
        validate(&response, sink)?;
        Ok(response)
    }
}
