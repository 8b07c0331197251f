use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use tiny_http::{Header, Request, Response, Server};
use tracing::debug;
use url::Url;

/// How the stub answers every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubResponse {
    /// Reply with this status and an empty JSON body.
    Status(u16),
    /// Hold the request this long before replying.
    Stall(Duration),
}

/// A request observed by [`StubServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn new(request: &Request) -> Option<Self> {
        let url = Url::parse("http://stub.invalid").ok()?.join(request.url()).ok()?;
        Some(Self {
            method: request.method().to_string(),
            path: url.path().to_owned(),
            query: url.query_pairs().into_owned().collect(),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.to_string(), h.value.to_string()))
                .collect(),
        })
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header names are compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_names(&self) -> Vec<&str> {
        self.query.iter().map(|(n, _)| n.as_str()).collect()
    }
}

#[derive(Debug)]
struct Shared {
    response: Mutex<StubResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Local stand-in for the robot-control API.
///
/// Listens on a free port of 127.0.0.1 and records every request it receives.
/// The server thread lives until the test process exits.
#[derive(Debug)]
pub struct StubServer {
    url: Url,
    shared: Arc<Shared>,
}

impl StubServer {
    pub fn start(response: StubResponse) -> Self {
        let port = portpicker::pick_unused_port().expect("No ports free");
        let server = Server::http(("127.0.0.1", port)).expect("failed to start stub server");
        let url = Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap();
        let shared = Arc::new(Shared {
            response: Mutex::new(response),
            requests: Mutex::new(vec![]),
        });
        let server_shared = shared.clone();
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let shared = server_shared.clone();
                // A stalled request must not hold up the ones behind it.
                thread::spawn(move || respond(request, &shared));
            }
        });
        debug!(%url, "stub server started");
        Self { url, shared }
    }

    pub fn with_status(status: u16) -> Self {
        Self::start(StubResponse::Status(status))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn set_response(&self, response: StubResponse) {
        *self.shared.response.lock().unwrap() = response;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.shared.requests.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.shared.requests.lock().unwrap().clear();
    }
}

/// Url of a local port nothing listens on.
pub fn unreachable_url() -> Url {
    let port = portpicker::pick_unused_port().expect("No ports free");
    Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
}

fn respond(request: Request, shared: &Shared) {
    if let Some(recorded) = RecordedRequest::new(&request) {
        debug!(?recorded, "stub server received request");
        shared.requests.lock().unwrap().push(recorded);
    }

    let status = match *shared.response.lock().unwrap() {
        StubResponse::Status(status) => status,
        StubResponse::Stall(duration) => {
            thread::sleep(duration);
            200
        }
    };
    let content_type = Header::from_bytes("Content-Type", "application/json").unwrap();
    let response = Response::from_string("{}")
        .with_status_code(status)
        .with_header(content_type);
    // The client may have given up already.
    let _ = request.respond(response);
}
