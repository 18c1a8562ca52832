use crate::output;

use std::path::PathBuf;

use clap::Args;
use color_eyre::Result;

use release_service::grpc::proto::release_notifier_client::ReleaseNotifierClient;
use release_service::grpc::proto::{self, worker_event};
use release_service::{
    log_channel, ChannelSink, ExecutionUnit, FileSink, LogSink, NotifierConfig, ReleaseEvent,
    RequestSpec,
};

/// Send a release event to the monitoring service
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Release name, e.g. a version tag
    #[arg(long)]
    pub name: String,

    /// Release start timestamp
    #[arg(long)]
    pub start: Option<String>,

    /// Release end timestamp (legacy body only)
    #[arg(long)]
    pub end: Option<String>,

    /// Use the legacy pipe-delimited body instead of JSON
    #[arg(long)]
    pub legacy_body: bool,

    /// Path to the notifier configuration file
    #[arg(long, short = 'c', value_name = "FILE", default_value = "notifier.yml")]
    pub config: PathBuf,

    /// Dispatch to a remote worker instead of executing in-process
    #[arg(long, value_name = "ADDR")]
    pub worker: Option<String>,

    /// Also append the build log to a file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: SendArgs) -> Result<()> {
    let config = NotifierConfig::from_file(&args.config)?;

    let mut event = ReleaseEvent::new(args.name);
    event.start = args.start;
    event.end = args.end;

    let spec = config.resolve_spec(&event, args.legacy_body)?;
    output::status("Sending", &spec.url);

    let file_sink = args.log_file.map(FileSink::new);

    let succeeded = match &args.worker {
        Some(addr) => dispatch_remote(addr, spec, &config, file_sink.as_ref()).await?,
        None => run_local(spec, &config, file_sink.as_ref()).await?,
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}

/// Run the execution unit in-process, draining its log in the foreground
async fn run_local(
    spec: RequestSpec,
    config: &NotifierConfig,
    file_sink: Option<&FileSink>,
) -> Result<bool> {
    let (tx, mut rx) = log_channel();
    let executor_config = config.executor_config();

    let handle = tokio::spawn(async move {
        let sink = ChannelSink::new(tx);
        ExecutionUnit::new(spec, executor_config).run(&sink).await
    });

    while let Some(line) = rx.recv().await {
        output::log_line(&line);
        if let Some(sink) = file_sink {
            sink.append(&line)?;
        }
    }

    match handle.await? {
        Ok(response) => {
            output::success(&format!("release recorded (status {})", response.status));
            Ok(true)
        }
        Err(err) => {
            output::failure(&err.to_string());
            Ok(false)
        }
    }
}

/// Dispatch the unit to a remote worker and relay its streamed log
async fn dispatch_remote(
    addr: &str,
    spec: RequestSpec,
    config: &NotifierConfig,
    file_sink: Option<&FileSink>,
) -> Result<bool> {
    let endpoint = if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{}", addr)
    };

    let mut client = ReleaseNotifierClient::connect(endpoint).await?;

    let request = proto::SendReleaseRequest {
        spec: Some(spec.into()),
        connect_timeout_ms: config.connect_timeout_secs * 1000,
        read_timeout_ms: config.read_timeout_secs * 1000,
    };

    let mut stream = client.send_release(request).await?.into_inner();

    let mut succeeded = false;
    while let Some(event) = stream.message().await? {
        match event.event {
            Some(worker_event::Event::Log(log)) => {
                output::log_line(&log.line);
                if let Some(sink) = file_sink {
                    sink.append(&log.line)?;
                }
            }
            Some(worker_event::Event::Completed(done)) => {
                let status = done.response.map(|r| r.status).unwrap_or_default();
                output::success(&format!("release recorded (status {})", status));
                succeeded = true;
            }
            Some(worker_event::Event::Failed(failed)) => {
                output::failure(&failed.message);
            }
            None => {}
        }
    }

    Ok(succeeded)
}
