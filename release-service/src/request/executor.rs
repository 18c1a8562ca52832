// HTTP Executor
// Issues the notification request and normalizes transport failures into
// synthetic responses

use crate::error::{ServiceError, ServiceResult};
use crate::request::models::{HttpMethod, RequestSpec, ResponseCapture};
use crate::sink::LogSink;

use std::error::Error as StdError;
use std::time::Duration;

/// Transport timeouts, resolved by the orchestrator before dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
        }
    }
}

/// Performs the single network attempt described by a [`RequestSpec`]
pub struct HttpExecutor {
    config: ExecutorConfig,
}

impl HttpExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// Execute the request and capture its result.
    ///
    /// Host-resolution failures come back as a synthetic 404 capture and
    /// connect/read timeouts as a synthetic 408; each substitution is noted
    /// in the log before returning. Any other transport failure is a hard
    /// error and produces no capture.
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        sink: &dyn LogSink,
    ) -> ServiceResult<ResponseCapture> {
        let url = reqwest::Url::parse(&spec.url)
            .map_err(|e| ServiceError::Config(format!("invalid url '{}': {}", spec.url, e)))?;

        // The client lives for exactly one attempt and is dropped on every
        // exit path below.
        let client = self.build_client(spec)?;

        match Self::send(&client, spec, url).await {
            Ok(response) => Self::capture(response).await,
            Err(err) => Self::normalize(err, sink),
        }
    }

    fn build_client(&self, spec: &RequestSpec) -> ServiceResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(self.config.connect_timeout)
            .timeout(self.config.read_timeout);

        if let Some(proxy) = spec.proxy.as_deref().filter(|p| !p.is_empty()) {
            builder = builder.proxy(parse_proxy(proxy)?);
        }

        builder
            .build()
            .map_err(|e| ServiceError::Execution(format!("failed to build HTTP client: {}", e)))
    }

    async fn send(
        client: &reqwest::Client,
        spec: &RequestSpec,
        url: reqwest::Url,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = client.request(spec.method.into(), url);

        for header in &spec.headers {
            request = request.header(&header.name, &header.value);
        }

        if spec.method.allows_body() {
            request = request.body(spec.body.clone());
        }

        request.send().await
    }

    async fn capture(response: reqwest::Response) -> ServiceResult<ResponseCapture> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content = response.text().await.map_err(ServiceError::Transport)?;

        Ok(ResponseCapture::new(status, content, content_type))
    }

    fn normalize(err: reqwest::Error, sink: &dyn LogSink) -> ServiceResult<ResponseCapture> {
        match FailureClass::of(&err) {
            FailureClass::HostResolution => {
                let detail = root_cause(&err);
                sink.append(&format!(
                    "Treating failed host resolution ({}) as 404 Not Found",
                    detail
                ))?;
                Ok(ResponseCapture::synthetic(
                    404,
                    format!("failed host resolution ({}) as 404 Not Found", detail),
                ))
            }
            FailureClass::ConnectOrTimeout(kind) => {
                let detail = root_cause(&err);
                sink.append(&format!(
                    "Treating {}({}) as 408 Request Timeout",
                    kind, detail
                ))?;
                Ok(ResponseCapture::synthetic(
                    408,
                    format!("{}({}) as 408 Request Timeout", kind, detail),
                ))
            }
            FailureClass::Other => Err(ServiceError::Transport(err)),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// How a transport failure maps onto the synthetic-status contract
enum FailureClass {
    /// Host name could not be resolved -> synthetic 404
    HostResolution,
    /// Connection refused or connect/read timeout -> synthetic 408
    ConnectOrTimeout(&'static str),
    /// Everything else (TLS, protocol) -> hard failure
    Other,
}

impl FailureClass {
    fn of(err: &reqwest::Error) -> Self {
        // Resolution failures also report is_connect(), so check them first.
        if is_resolution_failure(err) {
            return FailureClass::HostResolution;
        }
        if err.is_timeout() {
            return FailureClass::ConnectOrTimeout("timeout");
        }
        if err.is_connect() {
            return FailureClass::ConnectOrTimeout("connection failure");
        }
        FailureClass::Other
    }
}

/// DNS failures surface as connect errors; the resolver's io error deep in
/// the source chain is the only reliable marker.
fn is_resolution_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}

/// Innermost cause in the error chain, used in log lines and synthetic bodies
fn root_cause(err: &reqwest::Error) -> String {
    let mut current: &dyn StdError = err;
    while let Some(cause) = current.source() {
        current = cause;
    }
    current.to_string()
}

/// Accepts `host:port` (scheme defaulted to http) or a full proxy URL
fn parse_proxy(raw: &str) -> ServiceResult<reqwest::Proxy> {
    let url = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };
    reqwest::Proxy::all(url).map_err(|e| ServiceError::Config(format!("invalid proxy '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::models::Header;
    use crate::sink::{log_channel, ChannelSink, LogReceiver};
    use httpmock::prelude::*;

    fn spec(url: impl Into<String>) -> RequestSpec {
        RequestSpec {
            url: url.into(),
            method: HttpMethod::Post,
            body: "v1.0.0 | 100 | 200".to_string(),
            headers: vec![Header::new("Content-type", "application/json")],
            proxy: None,
        }
    }

    fn drain(mut rx: LogReceiver) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_capture_of_real_response() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/releases");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("{\"ok\":true}");
            })
            .await;

        let (tx, rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig::default());

        let capture = executor
            .execute(&spec(server.url("/api/releases")), &sink)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(capture.status, 200);
        assert_eq!(capture.content, "{\"ok\":true}");
        assert_eq!(capture.content_type.as_deref(), Some("application/json"));
        drop(sink);
        assert!(drain(rx).is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_host_becomes_synthetic_404() {
        let (tx, rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig::default());

        let capture = executor
            .execute(&spec("http://no-such-host.invalid/releases"), &sink)
            .await
            .unwrap();

        assert_eq!(capture.status, 404);
        assert!(capture.content.contains("as 404 Not Found"));
        assert_eq!(capture.content_type, None);

        drop(sink);
        let lines = drain(rx);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("failed host resolution"));
        assert!(lines[0].contains("as 404 Not Found"));
    }

    #[tokio::test]
    async fn test_unresponsive_socket_becomes_synthetic_408() {
        // Bound but never accepted and never answered; the client connects
        // and then waits for a response that never comes.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig {
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
        });

        let capture = executor
            .execute(&spec(format!("http://{}/releases", addr)), &sink)
            .await
            .unwrap();

        assert_eq!(capture.status, 408);
        assert!(capture.content.contains("as 408 Request Timeout"));

        drop(sink);
        let lines = drain(rx);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Treating "));
        assert!(lines[0].contains("as 408 Request Timeout"));
        drop(listener);
    }

    #[tokio::test]
    async fn test_refused_connection_becomes_synthetic_408() {
        // Grab a free port, then release it so the connect is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (tx, _rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig {
            connect_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
        });

        let capture = executor
            .execute(&spec(format!("http://{}/releases", addr)), &sink)
            .await
            .unwrap();

        assert_eq!(capture.status, 408);
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let (tx, _rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig::default());

        let err = executor.execute(&spec("not a url"), &sink).await.unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[tokio::test]
    async fn test_malformed_proxy_is_config_error() {
        let (tx, _rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig::default());

        let mut bad = spec("http://example.invalid/releases");
        bad.proxy = Some("::not a proxy::".to_string());

        let err = executor.execute(&bad, &sink).await.unwrap_err();
        assert!(matches!(err, ServiceError::Config(_)));
    }

    #[tokio::test]
    async fn test_body_skipped_for_bodyless_methods() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/releases").body("");
                then.status(200).body("ok");
            })
            .await;

        let mut get_spec = spec(server.url("/api/releases"));
        get_spec.method = HttpMethod::Get;

        let (tx, _rx) = log_channel();
        let sink = ChannelSink::new(tx);
        let executor = HttpExecutor::new(ExecutorConfig::default());

        let capture = executor.execute(&get_spec, &sink).await.unwrap();
        mock.assert_async().await;
        assert_eq!(capture.status, 200);
    }
}
