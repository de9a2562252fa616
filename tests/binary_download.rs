//! PNG payloads are written to disk byte-for-byte.

use plain_http_client::http::QueryString;
use plain_http_client::{Client, ClientConfig, ClientError, Outcome};

mod common;

fn png_response(payload: &[u8], content_length: Option<usize>) -> Vec<u8> {
    let mut response = b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\n".to_vec();
    if let Some(len) = content_length {
        response.extend_from_slice(format!("Content-Length: {len}\r\n").as_bytes());
    }
    response.extend_from_slice(b"\r\n");
    response.extend_from_slice(payload);
    response
}

fn payload() -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend((0..300_000u32).map(|i| (i % 253) as u8));
    bytes
}

#[test]
fn test_png_saved_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meow.png");
    let body = payload();
    let response = png_response(&body, Some(body.len()));
    let (addr, _) = common::start_programmable_backend(move |_| response.clone());

    let mut config = ClientConfig::default();
    config.output.png_path = path.clone();
    let mut client = Client::new(&config);

    let outcome = client
        .fetch(&format!("http://{addr}/cat.png"), &QueryString::default())
        .unwrap();

    match outcome {
        Outcome::SavedBinary { artifact, redirects } => {
            assert_eq!(artifact.path, path);
            assert_eq!(artifact.bytes, body.len() as u64);
            assert_eq!(redirects, 0);
        }
        other => panic!("expected saved artifact, got {other:?}"),
    }
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[test]
fn test_png_without_length_reads_to_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meow.png");
    let body = payload();
    let response = png_response(&body, None);
    let (addr, _) = common::start_programmable_backend(move |_| response.clone());

    let mut config = ClientConfig::default();
    config.output.png_path = path.clone();
    let outcome = Client::new(&config)
        .fetch(&format!("http://{addr}/"), &QueryString::default())
        .unwrap();

    assert!(matches!(outcome, Outcome::SavedBinary { .. }));
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[test]
fn test_png_short_body_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let response = png_response(b"\x89PNG", Some(1000));
    let (addr, _) = common::start_programmable_backend(move |_| response.clone());

    let mut config = ClientConfig::default();
    config.output.png_path = dir.path().join("meow.png");
    let err = Client::new(&config)
        .fetch(&format!("http://{addr}/"), &QueryString::default())
        .unwrap_err();

    assert!(matches!(err, ClientError::TruncatedBody { expected: 1000, received: 4 }));
}

#[test]
fn test_text_over_limit_is_fatal() {
    let mut response = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
    response.extend(std::iter::repeat(b'z').take(4096));
    let (addr, _) = common::start_programmable_backend(move |_| response.clone());

    let mut config = ClientConfig::default();
    config.limits.max_response_bytes = 1024;
    let err = Client::new(&config)
        .fetch(&format!("http://{addr}/"), &QueryString::default())
        .unwrap_err();

    assert!(matches!(err, ClientError::ResponseTooLarge { limit: 1024 }));
}

fn text_response_of(total: usize) -> Vec<u8> {
    let mut response = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
    let body = total - response.len();
    response.extend(std::iter::repeat(b'z').take(body));
    response
}

#[test]
fn test_text_exactly_at_limit_is_delivered() {
    let response = text_response_of(1024);
    let (addr, _) = common::start_programmable_backend(move |_| response.clone());

    let mut config = ClientConfig::default();
    config.limits.max_response_bytes = 1024;
    let outcome = Client::new(&config)
        .fetch(&format!("http://{addr}/"), &QueryString::default())
        .unwrap();

    match outcome {
        Outcome::Delivered(delivery) => {
            assert_eq!(delivery.status, 200);
            assert_eq!(delivery.response.len(), 1024);
            assert!(delivery.body().iter().all(|&b| b == b'z'));
        }
        other => panic!("expected delivery, got {other:?}"),
    }
}

#[test]
fn test_text_one_past_limit_is_fatal() {
    let response = text_response_of(1025);
    let (addr, _) = common::start_programmable_backend(move |_| response.clone());

    let mut config = ClientConfig::default();
    config.limits.max_response_bytes = 1024;
    let err = Client::new(&config)
        .fetch(&format!("http://{addr}/"), &QueryString::default())
        .unwrap_err();

    assert!(matches!(err, ClientError::ResponseTooLarge { limit: 1024 }));
}
