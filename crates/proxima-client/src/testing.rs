use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::transport::{HttpRequest, HttpResponse, Transport, TransportFailure};

type Outcome = Result<HttpResponse, TransportFailure>;

/// Transport that replays a fixed list of outcomes and records every call
pub(crate) struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<(Instant, HttpRequest)>>,
}

impl ScriptedTransport {
    pub(crate) fn new(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().iter().map(|(_, request)| request.clone()).collect()
    }

    /// Time between consecutive attempts
    pub(crate) fn gaps(&self) -> Vec<Duration> {
        let calls = self.calls.lock().unwrap();
        calls.windows(2).map(|pair| pair[1].0 - pair[0].0).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Outcome {
        self.calls.lock().unwrap().push((Instant::now(), request.clone()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::Other("script exhausted".to_owned())))
    }
}

pub(crate) fn ok_json(body: &serde_json::Value) -> HttpResponse {
    json_response(200, body)
}

pub(crate) fn json_response(status: u16, body: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status,
        content_type: Some("application/json".to_owned()),
        body: serde_json::to_vec(body).unwrap().into(),
    }
}
