//! Test helpers: a canned-response HTTP server and a scripted prompter.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use blogctl::api::ApiClient;
use blogctl::error::CliError;
use blogctl::session::Session;
use blogctl::ui::{main_menu, Prompter};

/// One request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

/// HTTP/1.1 server on an ephemeral port. Each connection gets the next
/// canned `(status, body)` pair (500 once they run out) and is closed.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    pub fn start(responses: &[(u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let queue: VecDeque<(u16, String)> = responses
            .iter()
            .map(|(status, body)| (*status, body.to_string()))
            .collect();

        let recorded = Arc::clone(&requests);
        thread::spawn(move || {
            let mut queue = queue;
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let response = queue.pop_front().unwrap_or((500, String::new()));
                let _ = serve(stream, response, &recorded);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> ApiClient {
        local_client(&self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn serve(
    stream: TcpStream,
    (status, body): (u16, String),
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            headers.push((key.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut raw = vec![0; length];
    reader.read_exact(&mut raw)?;

    // Recorded before the response goes out.
    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&raw).into_owned(),
    });

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )?;
    stream.flush()
}

/// Prompter that replays a fixed list of answers and remembers which
/// labels were asked. Running out of answers behaves like an interrupted
/// prompt.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub labels: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            labels: Vec::new(),
        }
    }

    fn next(&mut self, label: &str) -> Result<String, CliError> {
        self.labels.push(label.to_string());
        self.answers.pop_front().ok_or_else(|| {
            CliError::Prompt(io::Error::new(io::ErrorKind::Interrupted, "^C"))
        })
    }
}

impl Prompter for ScriptedPrompter {
    fn action(&mut self) -> Result<String, CliError> {
        self.next("Select Action")
    }

    fn text(&mut self, label: &str) -> Result<String, CliError> {
        self.next(label)
    }

    fn secret(&mut self, label: &str) -> Result<String, CliError> {
        self.next(label)
    }
}

/// Outcome of one scripted run of the client loop.
pub struct Run {
    pub result: Result<(), CliError>,
    pub output: String,
}

pub fn run_script(api: &ApiClient, session: &mut Session, answers: &[&str]) -> Run {
    let mut prompter = ScriptedPrompter::new(answers);
    let mut out = Vec::new();
    let result = main_menu(api, session, &mut prompter, &mut out);
    Run {
        result,
        output: String::from_utf8(out).expect("utf-8 output"),
    }
}

/// Client that never routes loopback traffic through a proxy from the
/// environment.
pub fn local_client(base_url: &str) -> ApiClient {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("build client");
    ApiClient::with_client(client, base_url)
}

/// Base URL with nothing listening behind it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
