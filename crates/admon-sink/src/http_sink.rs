//! HTTP sink: indexes documents with `POST /{collection}/_doc`.
//!
//! Each submission opens a fresh HTTP/1 connection. Cycles are minutes
//! apart, so there is nothing to gain from keeping a connection pool warm.

use std::future::Future;
use std::time::Duration;

use admon_core::config::SinkConfig;
use admon_core::BoxFuture;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HOST, USER_AGENT};
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tracing::debug;

use crate::client::SinkClient;
use crate::error::{SinkError, SinkResult};

pub(crate) const AGENT: &str = concat!("admon-relay/", env!("CARGO_PKG_VERSION"));

/// Longest response body kept in a `Rejected` error.
const MAX_ERROR_BODY: usize = 512;

/// Sink client speaking the Elasticsearch document index API.
#[derive(Debug, Clone)]
pub struct HttpSink {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpSink {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    pub fn from_config(config: &SinkConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.timeout)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    async fn index(&self, collection: &str, document: &serde_json::Value) -> SinkResult<()> {
        let address = self.address();
        let target = format!("/{collection}/_doc");
        let body = serde_json::to_vec(document)?;

        let request = Request::builder()
            .method(Method::POST)
            .uri(target.as_str())
            .header(HOST, address.as_str())
            .header(USER_AGENT, AGENT)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;

        let (status, body) = with_timeout(
            &address,
            self.timeout,
            exchange(&self.host, self.port, request),
        )
        .await?;

        if status.is_success() {
            debug!(%collection, %status, "document indexed");
            Ok(())
        } else {
            Err(SinkError::Rejected {
                target,
                status: status.as_u16(),
                body: truncate_body(&body),
            })
        }
    }
}

impl SinkClient for HttpSink {
    fn submit<'a>(
        &'a self,
        collection: &'a str,
        document: &'a serde_json::Value,
    ) -> BoxFuture<'a, SinkResult<()>> {
        Box::pin(self.index(collection, document))
    }
}

/// Send one request on a new connection and collect the full response.
pub(crate) async fn exchange(
    host: &str,
    port: u16,
    request: Request<Full<Bytes>>,
) -> SinkResult<(StatusCode, Bytes)> {
    let address = format!("{host}:{port}");
    let unreachable_err = |reason: String| SinkError::Unreachable {
        address: address.clone(),
        reason,
    };

    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|e| unreachable_err(format!("connect: {e}")))?;

    let io = TokioIo::new(stream);
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| unreachable_err(format!("handshake: {e}")))?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "sink connection closed with error");
        }
    });

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| unreachable_err(format!("request: {e}")))?;
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| unreachable_err(format!("response body: {e}")))?
        .to_bytes();

    Ok((status, body))
}

/// Bound `fut` by `timeout`, mapping expiry to `SinkError::Timeout`.
pub(crate) async fn with_timeout<T>(
    address: &str,
    timeout: Duration,
    fut: impl Future<Output = SinkResult<T>>,
) -> SinkResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(SinkError::Timeout {
            address: address.to_string(),
            timeout,
        }),
    }
}

pub(crate) fn truncate_body(body: &[u8]) -> String {
    String::from_utf8_lossy(body).chars().take(MAX_ERROR_BODY).collect()
}
