// Log Sink
// Line-oriented log channel between the executing worker and the
// orchestrator's build log

use crate::error::{ServiceError, ServiceResult};

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Sender half of a log line channel
pub type LogSender = mpsc::UnboundedSender<String>;

/// Receiver half of a log line channel
pub type LogReceiver = mpsc::UnboundedReceiver<String>;

/// Create a new log line channel
pub fn log_channel() -> (LogSender, LogReceiver) {
    mpsc::unbounded_channel()
}

/// Append-only, line-oriented sink for build log output.
///
/// Lines become visible at the orchestrator in emission order; every append
/// is flushed immediately.
pub trait LogSink: Send + Sync {
    fn append(&self, line: &str) -> ServiceResult<()>;
}

/// Channel-backed sink. The receiver side is drained into the orchestrator's
/// log, either directly or through the worker's response stream.
pub struct ChannelSink {
    tx: LogSender,
}

impl ChannelSink {
    pub fn new(tx: LogSender) -> Self {
        Self { tx }
    }
}

impl LogSink for ChannelSink {
    fn append(&self, line: &str) -> ServiceResult<()> {
        // A closed receiver means the orchestrator stopped listening; the
        // line has nowhere to go but execution continues.
        let _ = self.tx.send(line.to_string());
        Ok(())
    }
}

/// File-backed sink for runs where orchestrator and worker share a host.
///
/// The writer is materialized on the first append; failing to open it is
/// fatal, since the system cannot report outcomes without a log.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
        }
    }
}

impl LogSink for FileSink {
    fn append(&self, line: &str) -> ServiceResult<()> {
        let mut guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .map_err(ServiceError::LogSink)?;
            *guard = Some(BufWriter::new(file));
        }

        if let Some(writer) = guard.as_mut() {
            writeln!(writer, "{}", line).map_err(ServiceError::LogSink)?;
            writer.flush().map_err(ServiceError::LogSink)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_preserves_order() {
        let (tx, mut rx) = log_channel();
        let sink = ChannelSink::new(tx);

        sink.append("first").unwrap();
        sink.append("second").unwrap();
        sink.append("third").unwrap();
        drop(sink);

        assert_eq!(rx.recv().await, Some("first".to_string()));
        assert_eq!(rx.recv().await, Some("second".to_string()));
        assert_eq!(rx.recv().await, Some("third".to_string()));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn test_channel_sink_tolerates_closed_receiver() {
        let (tx, rx) = log_channel();
        drop(rx);

        let sink = ChannelSink::new(tx);
        assert!(sink.append("nobody listening").is_ok());
    }

    #[test]
    fn test_file_sink_materializes_on_first_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("build.log");

        let sink = FileSink::new(&path);
        assert!(!path.exists());

        sink.append("release started").unwrap();
        sink.append("release recorded").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "release started\nrelease recorded\n");
    }

    #[test]
    fn test_file_sink_open_failure_is_fatal() {
        let sink = FileSink::new("/nonexistent-dir/build.log");
        let err = sink.append("line").unwrap_err();
        assert!(matches!(err, ServiceError::LogSink(_)));
    }
}
