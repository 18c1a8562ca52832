use release_service::grpc::proto::{
    release_notifier_server::{ReleaseNotifier, ReleaseNotifierServer},
    worker_event, ExecutionCompleted, ExecutionFailed, LogLine, SendReleaseRequest, WorkerEvent,
};
use release_service::{log_channel, ChannelSink, ExecutionUnit, ExecutorConfig, RequestSpec};

use std::time::Duration;

use tokio_stream::wrappers::UnboundedReceiverStream;
use tonic::{transport::Server, Request, Response, Status};

#[derive(Debug, Default)]
pub struct ReleaseNotifierImpl;

#[tonic::async_trait]
impl ReleaseNotifier for ReleaseNotifierImpl {
    type SendReleaseStream = UnboundedReceiverStream<Result<WorkerEvent, Status>>;

    async fn send_release(
        &self,
        request: Request<SendReleaseRequest>,
    ) -> Result<Response<Self::SendReleaseStream>, Status> {
        let req = request.into_inner();

        let spec: RequestSpec = req
            .spec
            .ok_or_else(|| Status::invalid_argument("request spec is required"))?
            .into();

        let mut config = ExecutorConfig::default();
        if req.connect_timeout_ms > 0 {
            config.connect_timeout = Duration::from_millis(req.connect_timeout_ms);
        }
        if req.read_timeout_ms > 0 {
            config.read_timeout = Duration::from_millis(req.read_timeout_ms);
        }

        let (log_tx, mut log_rx) = log_channel();
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel();

        // Run the unit, relay its log lines, then emit the terminal event.
        // The log channel closes when the unit finishes, so draining it first
        // keeps every line ahead of the outcome in the stream.
        tokio::spawn(async move {
            let handle = tokio::spawn(async move {
                let sink = ChannelSink::new(log_tx);
                ExecutionUnit::new(spec, config).run(&sink).await
            });

            while let Some(line) = log_rx.recv().await {
                let event = WorkerEvent {
                    event: Some(worker_event::Event::Log(LogLine { line })),
                };
                if event_tx.send(Ok(event)).is_err() {
                    return;
                }
            }

            let terminal = match handle.await {
                Ok(Ok(response)) => worker_event::Event::Completed(ExecutionCompleted {
                    response: Some(response.into()),
                }),
                Ok(Err(err)) => worker_event::Event::Failed(ExecutionFailed {
                    message: err.to_string(),
                }),
                Err(join_err) => worker_event::Event::Failed(ExecutionFailed {
                    message: format!("execution task failed: {}", join_err),
                }),
            };
            let _ = event_tx.send(Ok(WorkerEvent {
                event: Some(terminal),
            }));
        });

        Ok(Response::new(UnboundedReceiverStream::new(event_rx)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "[::1]:50061".to_string())
        .parse()?;
    let service = ReleaseNotifierImpl::default();

    println!("Release worker listening on {}", addr);

    Server::builder()
        .add_service(ReleaseNotifierServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}
