//! HTTP telemetry adapter.
//!
//! Implements [`TelemetryPort`] with a blocking `ureq` agent.  Every
//! request is bounded by the configured timeout; any HTTP response
//! (including 4xx/5xx) is returned as a status code for the reporter to
//! judge.

use std::time::Duration;

use log::debug;

use crate::app::ports::TelemetryPort;
use crate::error::DeliveryFailure;

pub struct HttpTelemetry {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpTelemetry {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl TelemetryPort for HttpTelemetry {
    fn post(&mut self, path: &str, body: &[u8]) -> Result<u16, DeliveryFailure> {
        let url = self.url(path);
        let result = self
            .agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_bytes(body);
        match result {
            Ok(resp) => Ok(resp.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(ureq::Error::Transport(t)) => {
                debug!("POST {} transport error: {}", url, t);
                if is_timeout(&t) {
                    Err(DeliveryFailure::Timeout)
                } else {
                    Err(DeliveryFailure::Transport)
                }
            }
        }
    }
}

fn is_timeout(t: &ureq::Transport) -> bool {
    use std::error::Error as _;
    let mut source = t.source();
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            );
        }
        source = e.source();
    }
    false
}
