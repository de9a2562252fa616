//! Shared utilities for integration testing.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Read a request head, returning its request line.
fn read_request_line(socket: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut byte = [0u8; 1];
    while !request.ends_with(b"\r\n\r\n") {
        match socket.read(&mut byte) {
            Ok(0) | Err(_) => break,
            Ok(_) => request.push(byte[0]),
        }
    }
    String::from_utf8_lossy(&request)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Start a simple mock backend that returns a fixed response.
#[allow(dead_code)]
pub fn start_mock_backend(response: &'static [u8]) -> SocketAddr {
    start_programmable_backend(move |_| response.to_vec()).0
}

/// Start a programmable mock backend. The handler receives the request line
/// (`GET /path HTTP/1.1`) and returns raw response bytes, written in small
/// pieces before the socket is closed. Returns the bound address and a
/// counter of accepted connections.
#[allow(dead_code)]
pub fn start_programmable_backend<F>(f: F) -> (SocketAddr, Arc<AtomicUsize>)
where
    F: Fn(&str) -> Vec<u8> + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);
    let f = Arc::new(f);

    thread::spawn(move || {
        for socket in listener.incoming() {
            let Ok(mut socket) = socket else { break };
            counter.fetch_add(1, Ordering::SeqCst);
            let f = Arc::clone(&f);
            thread::spawn(move || {
                let request_line = read_request_line(&mut socket);
                let response = f(&request_line);
                for piece in response.chunks(512) {
                    if socket.write_all(piece).is_err() {
                        return;
                    }
                    let _ = socket.flush();
                }
            });
        }
    });

    (addr, accepted)
}

/// Path from a request line.
#[allow(dead_code)]
pub fn request_path(request_line: &str) -> &str {
    request_line.split_whitespace().nth(1).unwrap_or("/")
}
