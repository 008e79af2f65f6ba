use std::collections::HashMap;
use std::error::Error as StdError;
use std::sync::{Arc, Mutex};

use super::{BoxFuture, HttpResponse, HttpTransport, SmartisClient};
use crate::domain::{ApiKey, CrmToken};

pub(super) const BASE_URL: &str = "https://example.invalid/api/";

#[derive(Debug, Clone)]
pub(super) struct RecordedRequest {
    pub url: String,
    pub api_key: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Debug, Clone)]
enum Behaviour {
    Respond,
    Fail(String),
    Hang,
}

#[derive(Debug)]
struct FakeTransportState {
    behaviour: Behaviour,
    responses: HashMap<String, (u16, String)>,
    requests: Vec<RecordedRequest>,
}

/// In-memory transport replaying one scripted response per URL.
///
/// Unscripted URLs answer `404` with an empty body.
#[derive(Debug, Clone)]
pub(super) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeTransportState {
                behaviour: Behaviour::Respond,
                responses: HashMap::new(),
                requests: Vec::new(),
            })),
        }
    }

    pub fn respond(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(url.to_owned(), (status, body.into()));
        self
    }

    pub fn fail_with(self, message: &str) -> Self {
        self.state.lock().unwrap().behaviour = Behaviour::Fail(message.to_owned());
        self
    }

    pub fn hang(self) -> Self {
        self.state.lock().unwrap().behaviour = Behaviour::Hang;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

impl HttpTransport for FakeTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let (behaviour, response) = {
                let mut state = self.state.lock().unwrap();
                state.requests.push(RecordedRequest {
                    url: url.to_owned(),
                    api_key: api_key.to_owned(),
                    body,
                });
                let response = state
                    .responses
                    .get(url)
                    .cloned()
                    .unwrap_or((404, String::new()));
                (state.behaviour.clone(), response)
            };

            match behaviour {
                Behaviour::Respond => Ok(HttpResponse {
                    status: response.0,
                    body: response.1,
                }),
                Behaviour::Fail(message) => Err(message.into()),
                Behaviour::Hang => std::future::pending().await,
            }
        })
    }
}

pub(super) fn make_client(crm_token: Option<&str>, transport: FakeTransport) -> SmartisClient {
    SmartisClient {
        api_key: ApiKey::new("test_key").unwrap(),
        crm_token: crm_token.map(|token| CrmToken::new(token).unwrap()),
        base_url: BASE_URL.to_owned(),
        http: Arc::new(transport),
    }
}
