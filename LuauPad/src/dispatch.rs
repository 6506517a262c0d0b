//! Execution dispatcher: sends script text to the remote endpoint
//!
//! Dispatch is fire-and-forget. The request runs on a rayon worker, the outcome
//! is logged, and a [`DispatchHandle`] lets a caller wait for it if it wants to.
//! Nothing here touches documents or raises a user-visible alert.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use tracing::{error, info};

use crate::error::NetworkError;

/// Body of the connectivity probe
pub const PROBE_PAYLOAD: &str = "inject";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Full text of a script
    Script(String),
    /// Connectivity probe
    Probe,
}

impl Payload {
    pub fn body(&self) -> &str {
        match self {
            Payload::Script(content) => content.as_str(),
            Payload::Probe => PROBE_PAYLOAD,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Payload::Script(_) => "script",
            Payload::Probe => "probe",
        }
    }
}

/// Request/response exchange with the endpoint
pub trait Transport: Send + Sync {
    /// POST `body` as plain text and return the response body
    fn post_text(&self, endpoint: &str, body: &str) -> Result<String, NetworkError>;
}

/// HTTP transport over `ureq`
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Transport for HttpTransport {
    fn post_text(&self, endpoint: &str, body: &str) -> Result<String, NetworkError> {
        let response = self
            .agent
            .post(endpoint)
            .set("content-type", "text/plain")
            .send_string(body);

        match response {
            Ok(resp) => resp.into_string().map_err(|e| NetworkError::Transport {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            }),
            Err(ureq::Error::Status(status, resp)) => Err(NetworkError::Status {
                endpoint: endpoint.to_string(),
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(NetworkError::Transport {
                endpoint: endpoint.to_string(),
                message: transport.to_string(),
            }),
        }
    }
}

/// Pending outcome of one dispatch. Dropping it does not cancel the request.
#[must_use = "drop the handle explicitly to fire and forget"]
pub struct DispatchHandle {
    receiver: Receiver<Result<String, NetworkError>>,
}

impl DispatchHandle {
    /// Block until the request completes
    pub fn wait(self) -> Result<String, NetworkError> {
        self.receiver.recv().unwrap_or(Err(NetworkError::Dropped))
    }

    /// Block for at most `timeout`; `None` if the request is still running
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<String, NetworkError>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(NetworkError::Dropped)),
        }
    }
}

/// Sends payloads to one fixed endpoint
#[derive(Clone)]
pub struct Dispatcher {
    endpoint: String,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(endpoint: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport,
        }
    }

    /// Dispatcher backed by [`HttpTransport`]
    pub fn http(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::new(endpoint, Arc::new(HttpTransport::new(timeout)))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Start the request in the background; exactly one result is reported
    pub fn dispatch(&self, payload: Payload) -> DispatchHandle {
        let (sender, receiver) = mpsc::sync_channel(1);
        let endpoint = self.endpoint.clone();
        let transport = Arc::clone(&self.transport);

        rayon::spawn(move || {
            let kind = payload.kind();
            info!(%endpoint, kind, bytes = payload.body().len(), "dispatching");
            let result = transport.post_text(&endpoint, payload.body());
            match &result {
                Ok(body) => info!(%endpoint, kind, response = %body, "dispatch completed"),
                Err(e) => error!(%endpoint, kind, "dispatch failed: {e}"),
            }
            // The caller may have dropped the handle
            let _ = sender.send(result);
        });

        DispatchHandle { receiver }
    }

    pub fn execute(&self, content: impl Into<String>) -> DispatchHandle {
        self.dispatch(Payload::Script(content.into()))
    }

    pub fn probe(&self) -> DispatchHandle {
        self.dispatch(Payload::Probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<(String, String)>>,
    }

    impl Transport for Recorder {
        fn post_text(&self, endpoint: &str, body: &str) -> Result<String, NetworkError> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push((endpoint.to_string(), body.to_string()));
            }
            Ok(format!("ran {} bytes", body.len()))
        }
    }

    struct Unreachable;

    impl Transport for Unreachable {
        fn post_text(&self, endpoint: &str, _body: &str) -> Result<String, NetworkError> {
            Err(NetworkError::Transport {
                endpoint: endpoint.to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn test_probe_sends_sentinel() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new("http://endpoint/", recorder.clone());

        let response = dispatcher.probe().wait().unwrap();
        assert_eq!(response, "ran 6 bytes");
        assert_eq!(
            *recorder.requests.lock().unwrap(),
            vec![("http://endpoint/".to_string(), "inject".to_string())]
        );
    }

    #[test]
    fn test_script_sent_verbatim() {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::new("http://endpoint/", recorder.clone());
        let script = "print('hi')\n-- trailing";

        dispatcher.execute(script).wait().unwrap();
        assert_eq!(recorder.requests.lock().unwrap()[0].1, script);
    }

    #[test]
    fn test_failure_is_reported_once() {
        let dispatcher = Dispatcher::new("http://127.0.0.1:9/", Arc::new(Unreachable));
        let handle = dispatcher.probe();
        let result = handle
            .wait_timeout(Duration::from_secs(5))
            .expect("dispatch did not complete");
        assert!(matches!(result, Err(NetworkError::Transport { .. })));
        assert!(matches!(
            handle.wait_timeout(Duration::from_millis(10)),
            Some(Err(NetworkError::Dropped))
        ));
    }
}
