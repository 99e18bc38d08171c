//! One-shot connectivity probe.
//!
//! Issues `GET /` against the sink and returns the banner it answers with.
//! The daemon runs this once at startup so a misconfigured sink fails fast
//! instead of burning the failure budget.

use std::time::Duration;

use bytes::Bytes;
use http::header::{HOST, USER_AGENT};
use http::{Method, Request};
use http_body_util::Full;
use tracing::debug;

use crate::error::{SinkError, SinkResult};
use crate::http_sink::{exchange, truncate_body, with_timeout, AGENT};

/// Probe the sink at `host:port`, returning the response body on 2xx.
pub async fn probe(host: &str, port: u16, timeout: Duration) -> SinkResult<String> {
    let address = format!("{host}:{port}");
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(HOST, address.as_str())
        .header(USER_AGENT, AGENT)
        .body(Full::new(Bytes::new()))?;

    let (status, body) = with_timeout(&address, timeout, exchange(host, port, request)).await?;
    if status.is_success() {
        debug!(%address, %status, "sink probe succeeded");
        Ok(String::from_utf8_lossy(&body).into_owned())
    } else {
        debug!(%address, %status, "sink probe non-2xx");
        Err(SinkError::Rejected {
            target: "/".to_string(),
            status: status.as_u16(),
            body: truncate_body(&body),
        })
    }
}
