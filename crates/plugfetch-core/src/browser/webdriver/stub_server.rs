//! Minimal HTTP/1.1 server standing in for chromedriver in unit tests.
//!
//! Every request is answered by a closure that sees the request and how many
//! earlier requests hit the same method and path, so a test can script
//! "fail twice, then succeed".

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub path: String,
}

pub struct StubServer {
    pub base: String,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl StubServer {
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

/// Start serving in a background thread. `respond` returns (status, JSON body).
pub fn start<F>(respond: F) -> StubServer
where
    F: Fn(&Request, usize) -> (u32, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let respond = Arc::new(respond);
    thread::spawn(move || {
        let counts = Mutex::new(HashMap::<(String, String), usize>::new());
        for stream in listener.incoming().flatten() {
            let Some(request) = read_request(&stream) else {
                continue;
            };
            let nth = {
                let mut counts = counts.lock().unwrap();
                let n = counts
                    .entry((request.method.clone(), request.path.clone()))
                    .or_insert(0);
                *n += 1;
                *n - 1
            };
            seen.lock().unwrap().push(request.clone());
            let (status, body) = respond(&request, nth);
            write_response(stream, status, &body);
        }
    });
    StubServer {
        base: format!("http://127.0.0.1:{port}"),
        requests,
    }
}

fn read_request(mut stream: &TcpStream) -> Option<Request> {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|l| {
            let (name, value) = l.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next()?.split_whitespace();
    Some(Request {
        method: request_line.next()?.to_string(),
        path: request_line.next()?.to_string(),
    })
}

fn write_response(mut stream: TcpStream, status: u32, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// `{"value": <value>}` with status 200.
pub fn ok(value: &str) -> (u32, String) {
    (200, format!(r#"{{"value": {value}}}"#))
}

/// A WebDriver error object with the status chromedriver uses for it.
pub fn webdriver_error(status: u32, error: &str) -> (u32, String) {
    (
        status,
        format!(r#"{{"value": {{"error": "{error}", "message": "stub", "stacktrace": ""}}}}"#),
    )
}
