//! HttpTransport against a one-shot local server

use chrono::NaiveDate;
use intake::{NormalizedAnswers, SubmitRequest, Transport, TransportError};
use intake_http::{ApiConfig, HttpTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn request() -> SubmitRequest {
    let mut answers = NormalizedAnswers::new();
    answers.insert("Q1", "A");
    SubmitRequest {
        full_name: "Ada Okafor".into(),
        email: "ada@example.com".into(),
        phone: "+2348000000000".into(),
        gender: "Female".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 3, 14).unwrap(),
        occupation: "Engineer".into(),
        address: "Lagos".into(),
        marital_status: "Single".into(),
        dependants_count: 0,
        answers,
    }
}

/// Accept one connection, capture the raw request and answer with `status` and `body`.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if raw.len() >= header_end + 4 + length || n == 0 {
                    break;
                }
            } else if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    });

    (base_url, handle)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_posts_json_to_submit_endpoint() {
    let (base_url, server) =
        serve_once("400 Bad Request", r#"{"message":"Email already exists"}"#).await;
    let config = ApiConfig::new(Some(&format!("{base_url}/")), None).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    let response = transport.post_submission(&request()).await.unwrap();
    assert_eq!(response.status, 400);
    assert_eq!(response.body, r#"{"message":"Email already exists"}"#);

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/questionnaire/submit HTTP/1.1"));
    let body = &raw[raw.find("\r\n\r\n").unwrap() + 4..];
    let json: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(json["fullName"], "Ada Okafor");
    assert_eq!(json["answers"]["Q1"], "A");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_success_status_passes_through() {
    let (base_url, server) = serve_once("201 Created", r#"{"success":true}"#).await;
    let config = ApiConfig::new(Some(&base_url), None).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    let response = transport.post_submission(&request()).await.unwrap();
    assert!(response.is_success());
    server.await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_reason_is_kept() {
    let (base_url, server) = serve_once("503 Service Unavailable", "").await;
    let config = ApiConfig::new(Some(&base_url), None).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    let response = transport.post_submission(&request()).await.unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.reason.as_deref(), Some("Service Unavailable"));
    assert!(response.body.is_empty());
    server.await.unwrap();

    let outcome = intake::classify(Ok(response), &config.docs_url);
    assert_eq!(
        outcome.failure().map(|f| f.message.as_str()),
        Some("HTTP 503: Service Unavailable")
    );
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Grab a free port, then close it again.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = ApiConfig::new(Some(&base_url), None).unwrap();
    let transport = HttpTransport::new(&config).unwrap();

    let err = transport.post_submission(&request()).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
}
