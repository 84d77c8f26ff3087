//! HTTP transport to the capture device.
//!
//! One `DeviceClient` per invocation; every operation maps to a single HTTP
//! call. Failures are classified into the `ClientError` taxonomy so the CLI
//! can report them uniformly.

use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use reqwest::{Method, StatusCode};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::{ClientError, Result};
use crate::manifest::Manifest;
use crate::report::{self, Report};

/// Sink for the verbose request/response trace.
///
/// The trace is a forensic record of what the server actually sent; the raw
/// body is always emitted before any parse attempt.
pub trait TraceSink: Send + Sync {
    fn line(&self, text: &str);
}

/// Writes trace lines to stderr.
pub struct StderrTrace;

impl TraceSink for StderrTrace {
    fn line(&self, text: &str) {
        eprintln!("{}", text);
    }
}

/// Discards all trace output.
pub struct NoopTrace;

impl TraceSink for NoopTrace {
    fn line(&self, _text: &str) {}
}

/// Download format for a stored recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingFormat {
    Qmdl,
    Pcap,
    Zip,
}

impl RecordingFormat {
    pub fn path_segment(self) -> &'static str {
        match self {
            RecordingFormat::Qmdl => "qmdl",
            RecordingFormat::Pcap => "pcap",
            RecordingFormat::Zip => "zip",
        }
    }

    /// Default file extension for downloads.
    pub fn extension(self) -> &'static str {
        self.path_segment()
    }
}

/// HTTP client for a single device.
pub struct DeviceClient {
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    verbose: bool,
    http: reqwest::Client,
    trace: Arc<dyn TraceSink>,
}

impl DeviceClient {
    /// Create a client for `host`.
    ///
    /// Basic auth is attached to every request iff both `username` and
    /// `password` are set.
    pub fn new(
        host: &str,
        username: Option<String>,
        password: Option<String>,
        verbose: bool,
        trace: Arc<dyn TraceSink>,
    ) -> Result<Self> {
        let base_url = normalize_host(host);

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::Connection {
                host: base_url.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url,
            username,
            password,
            verbose,
            http,
            trace,
        })
    }

    /// GET `/api/analysis-report/live`, parsed as NDJSON.
    pub async fn live_report(&self) -> Result<Report> {
        let body = self
            .request_expect(Method::GET, "/api/analysis-report/live", StatusCode::OK)
            .await?;
        report::parse_ndjson(&body)
    }

    /// GET `/api/analysis-report/{name}`, parsed as NDJSON.
    pub async fn analysis_report(&self, name: &str) -> Result<Report> {
        let path = format!("/api/analysis-report/{}", encode_segment(name));
        let body = self.request_expect(Method::GET, &path, StatusCode::OK).await?;
        report::parse_ndjson(&body)
    }

    /// GET `/api/qmdl-manifest`.
    pub async fn manifest(&self) -> Result<Manifest> {
        let body = self
            .request_expect(Method::GET, "/api/qmdl-manifest", StatusCode::OK)
            .await?;
        report::parse_json(&body)
    }

    /// GET `/api/analysis` (queue status).
    pub async fn analysis_status(&self) -> Result<serde_json::Value> {
        let body = self
            .request_expect(Method::GET, "/api/analysis", StatusCode::OK)
            .await?;
        report::parse_json(&body)
    }

    /// GET `/api/system-stats`.
    pub async fn system_stats(&self) -> Result<serde_json::Value> {
        let body = self
            .request_expect(Method::GET, "/api/system-stats", StatusCode::OK)
            .await?;
        report::parse_json(&body)
    }

    /// POST `/api/delete-recording/{name}`.
    pub async fn delete_recording(&self, name: &str) -> Result<()> {
        let path = format!("/api/delete-recording/{}", encode_segment(name));
        self.request_expect(Method::POST, &path, StatusCode::ACCEPTED)
            .await?;
        Ok(())
    }

    /// POST `/api/analysis/{name}`; the 202 body is the queue status.
    pub async fn start_analysis(&self, name: &str) -> Result<serde_json::Value> {
        let path = format!("/api/analysis/{}", encode_segment(name));
        let body = self
            .request_expect(Method::POST, &path, StatusCode::ACCEPTED)
            .await?;
        report::parse_json(&body)
    }

    /// POST `/api/stop-recording`.
    pub async fn stop_recording(&self) -> Result<()> {
        self.request_expect(Method::POST, "/api/stop-recording", StatusCode::ACCEPTED)
            .await?;
        Ok(())
    }

    /// POST `/api/start-recording`.
    pub async fn start_recording(&self) -> Result<()> {
        self.request_expect(Method::POST, "/api/start-recording", StatusCode::ACCEPTED)
            .await?;
        Ok(())
    }

    /// GET `/api/{qmdl|pcap|zip}/{name}`, streaming the body into `sink`.
    ///
    /// The success body is never buffered; each chunk is written as it
    /// arrives. Returns the number of bytes written. On a non-success
    /// status the error body is read whole to build the `Api` message.
    pub async fn download_recording<W>(
        &self,
        name: &str,
        format: RecordingFormat,
        sink: &mut W,
    ) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let path = format!("/api/{}/{}", format.path_segment(), encode_segment(name));
        let url = format!("{}{}", self.base_url, path);

        let builder = self.begin_request(&Method::GET, &url);
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| self.connection_error(e))?;
        let status = response.status();

        if status != StatusCode::OK {
            let body = response.text().await.map_err(|e| self.connection_error(e))?;
            self.trace_status(status, start.elapsed());
            if self.verbose {
                self.trace.line(&body);
            }
            return Err(api_error(status, &body));
        }

        self.trace_status(status, start.elapsed());

        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.connection_error(e))?;
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        sink.flush().await?;

        Ok(written)
    }

    /// Buffered request path: send, read the whole body, trace it, then
    /// check the status against `expected`.
    async fn request_expect(
        &self,
        method: Method,
        path: &str,
        expected: StatusCode,
    ) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let builder = self.begin_request(&method, &url);
        let start = Instant::now();

        let response = builder.send().await.map_err(|e| self.connection_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.connection_error(e))?;

        self.trace_status(status, start.elapsed());
        if self.verbose {
            self.trace.line(&body);
        }

        if status != expected {
            return Err(api_error(status, &body));
        }

        Ok(body)
    }

    fn begin_request(&self, method: &Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method.clone(), url);

        if let (Some(user), Some(pass)) = (&self.username, &self.password) {
            builder = builder.basic_auth(user, Some(pass));
        }

        if self.verbose {
            self.trace.line(&format!("{} {}", method, url));
            if let (Some(user), Some(_)) = (&self.username, &self.password) {
                // The password never reaches the trace.
                self.trace.line(&format!("Basic Auth: user={}", user));
            }
            self.trace
                .line(&format!("Started: {}", chrono::Utc::now().to_rfc3339()));
        }

        builder
    }

    fn trace_status(&self, status: StatusCode, elapsed: std::time::Duration) {
        if self.verbose {
            self.trace.line(&format!(
                "{} {} ({:.3}s)",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
                elapsed.as_secs_f64()
            ));
        }
    }

    fn connection_error(&self, e: reqwest::Error) -> ClientError {
        ClientError::Connection {
            host: self.base_url.clone(),
            message: e.to_string(),
        }
    }
}

/// Prepend `http://` when the host lacks a scheme; pass through otherwise.
fn normalize_host(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

/// Encode one path segment form-urlencoded style: space becomes `+`, and
/// `/`/`?` cannot survive into the path.
fn encode_segment(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let detail = body.trim();
    let detail = if detail.is_empty() {
        status.canonical_reason().unwrap_or("unknown status")
    } else {
        detail
    };
    ClientError::Api(format!("Server returned {}: {}", status.as_u16(), detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectTrace(Mutex<Vec<String>>);

    impl CollectTrace {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Vec::new())))
        }

        fn lines(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl TraceSink for CollectTrace {
        fn line(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("10.0.0.1:8080"), "http://10.0.0.1:8080");
        assert_eq!(normalize_host("device.local"), "http://device.local");
        assert_eq!(normalize_host("http://10.0.0.1"), "http://10.0.0.1");
        assert_eq!(
            normalize_host("https://device.local:8443"),
            "https://device.local:8443"
        );
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("my recording"), "my+recording");
        assert_eq!(encode_segment("plain-name_1"), "plain-name_1");

        let encoded = encode_segment("foo/bar?baz");
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('?'));
        assert_eq!(encoded, "foo%2Fbar%3Fbaz");
    }

    #[test]
    fn test_api_error_with_body() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let text = format!("{}", err);
        assert!(text.contains("Server returned 500"));
        assert!(text.contains("boom"));
    }

    #[test]
    fn test_api_error_empty_body_uses_status_phrase() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, "  \n");
        let text = format!("{}", err);
        assert!(text.contains("Server returned 500"));
        assert!(text.contains("Internal Server Error"));
    }

    #[test]
    fn test_format_path_segments() {
        assert_eq!(RecordingFormat::Qmdl.path_segment(), "qmdl");
        assert_eq!(RecordingFormat::Pcap.path_segment(), "pcap");
        assert_eq!(RecordingFormat::Zip.path_segment(), "zip");
        assert_eq!(RecordingFormat::Pcap.extension(), "pcap");
    }

    #[test]
    fn test_trace_never_carries_password() {
        let trace = CollectTrace::new();
        let client = DeviceClient::new(
            "10.0.0.1",
            Some("admin".to_string()),
            Some("hunter2".to_string()),
            true,
            trace.clone(),
        )
        .unwrap();

        let _ = client.begin_request(&Method::GET, "http://10.0.0.1/api/analysis");

        let lines = trace.lines();
        assert_eq!(lines[0], "GET http://10.0.0.1/api/analysis");
        assert_eq!(lines[1], "Basic Auth: user=admin");
        assert!(lines.iter().all(|l| !l.contains("hunter2")));
    }

    #[test]
    fn test_trace_silent_without_verbose() {
        let trace = CollectTrace::new();
        let client = DeviceClient::new("10.0.0.1", None, None, false, trace.clone()).unwrap();

        let _ = client.begin_request(&Method::GET, "http://10.0.0.1/api/analysis");

        assert!(trace.lines().is_empty());
    }

    #[test]
    fn test_trace_skips_auth_line_without_credentials() {
        let trace = CollectTrace::new();
        let client = DeviceClient::new(
            "10.0.0.1",
            Some("admin".to_string()),
            None,
            true,
            trace.clone(),
        )
        .unwrap();

        let _ = client.begin_request(&Method::GET, "http://10.0.0.1/api/analysis");

        let lines = trace.lines();
        assert!(lines.iter().all(|l| !l.starts_with("Basic Auth")));
    }
}
