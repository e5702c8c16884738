//! Loopback HTTP stubs and log capture for unit tests.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub struct Canned {
    status: u16,
    content_type: &'static str,
    body: String,
}

pub fn reply(status: u16, body: &str) -> Canned {
    Canned {
        status,
        content_type: "text/plain; charset=utf-8",
        body: body.to_string(),
    }
}

pub fn json_reply(status: u16, body: &str) -> Canned {
    Canned {
        content_type: "application/json",
        ..reply(status, body)
    }
}

/// Answers one connection per canned reply, in order, then stops.
pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<Vec<String>>,
}

impl StubServer {
    pub fn serve(replies: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            replies
                .iter()
                .map(|canned| {
                    let (stream, _) = listener.accept().unwrap();
                    answer(stream, canned)
                })
                .collect()
        });
        StubServer { addr, handle }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw requests (head and body) in arrival order. Blocks until every
    /// canned reply has gone out.
    pub fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn answer(stream: TcpStream, canned: &Canned) -> String {
    let mut reader = BufReader::new(stream);
    let mut request = String::new();
    let mut content_length = 0;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap() == 0 {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
        request.push_str(&line);
        if line == "\r\n" {
            break;
        }
    }
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).unwrap();
    request.push_str(&String::from_utf8_lossy(&body));

    let mut stream = reader.into_inner();
    write!(
        stream,
        "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        canned.status,
        canned.content_type,
        canned.body.len(),
        canned.body
    )
    .unwrap();
    stream.flush().unwrap();
    request
}

/// An address nothing listens on: bound, then released.
pub fn closed_port() -> SocketAddr {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap()
}

/// Accepts a single connection and holds it open for `hold` without ever
/// answering.
pub fn silent_server(hold: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(hold);
            drop(stream);
        }
    });
    addr
}

#[derive(Clone, Default)]
struct LogBuf(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under an `info`-level fmt subscriber and return what it logged.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buf = LogBuf::default();
    let writer = buf.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&buf.0.lock().unwrap()).into_owned();
    (out, text)
}
