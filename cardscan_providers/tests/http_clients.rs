//! Vision and Airtable clients exercised against a local HTTP stub.

use cardscan_core::{BusinessCard, CardImage, CardScanner, ExtractionSource, RecordSink, persist};
use cardscan_providers::{AirtableSink, OpenAiVisionProvider, RetryPolicy};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Serve `responses` in order, one per connection, and forward each raw
/// request (lowercased) to the returned receiver.
async fn stub_server(responses: Vec<(u16, String)>) -> (String, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut stream).await;
            let _ = tx.send(request.to_lowercase());
            let reply = format!(
                "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (format!("http://{addr}"), rx)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn image() -> CardImage {
    CardImage::new("image/png", vec![0x89, 0x50, 0x4E, 0x47]).unwrap()
}

fn card() -> BusinessCard {
    BusinessCard {
        name: Some("Jane  Doe".to_string()),
        phone: Some("(415) 555-0100".to_string()),
        ..BusinessCard::default()
    }
}

#[tokio::test]
async fn airtable_save_posts_row_and_returns_id() {
    let (server, mut requests) = stub_server(vec![(
        200,
        r#"{"records":[{"id":"rec123","fields":{}}]}"#.to_string(),
    )])
    .await;
    let sink = AirtableSink::new("pat-test".to_string(), "appXYZ".to_string(), None)
        .with_base_url(format!("{server}/v0"));

    let id = persist(&sink, &card()).await.unwrap();
    assert_eq!(id, "rec123");

    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("post /v0/appxyz/crm http/1.1"));
    assert!(request.contains("authorization: bearer pat-test"));
    assert!(request.contains(r#""contact no.":"(415) 555-0100""#));
    assert!(request.contains(r#""name":"jane doe""#));
    assert!(request.contains(r#""notes on card":"""#));
}

#[tokio::test]
async fn airtable_rejection_is_wrapped() {
    let (server, _requests) = stub_server(vec![(
        422,
        r#"{"error":{"type":"UNKNOWN_FIELD_NAME"}}"#.to_string(),
    )])
    .await;
    let sink = AirtableSink::new("pat-test".to_string(), "appXYZ".to_string(), None)
        .with_base_url(format!("{server}/v0"));

    let err = sink.save(&card()).await.unwrap_err().to_string();
    assert!(err.starts_with("Failed to save data to Airtable"));
    assert!(err.contains("422"));
    assert!(err.contains("UNKNOWN_FIELD_NAME"));
}

#[tokio::test]
async fn airtable_table_name_is_percent_encoded() {
    let (server, mut requests) =
        stub_server(vec![(200, r#"{"records":[{"id":"rec9"}]}"#.to_string())]).await;
    let sink = AirtableSink::new(
        "pat-test".to_string(),
        "appXYZ".to_string(),
        Some("Leads 2024".to_string()),
    )
    .with_base_url(format!("{server}/v0"));
    assert_eq!(sink.table_name(), "Leads 2024");

    sink.save(&card()).await.unwrap();
    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("post /v0/appxyz/leads%202024 http/1.1"));
}

#[tokio::test]
async fn airtable_connection_test_reports_status() {
    let (server, mut requests) = stub_server(vec![
        (200, r#"{"records":[]}"#.to_string()),
        (404, r#"{"error":"NOT_FOUND"}"#.to_string()),
    ])
    .await;
    let sink = AirtableSink::new("pat-test".to_string(), "appXYZ".to_string(), None)
        .with_base_url(format!("{server}/v0"));

    assert!(sink.test_connection().await);
    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("get /v0/appxyz/crm?maxrecords=1 http/1.1"));

    assert!(!sink.test_connection().await);
}

#[tokio::test]
async fn vision_reply_flows_through_scanner() {
    let reply = serde_json::json!({
        "choices": [{
            "message": {
                "content": "```json\n{\"name\": \"Jane Doe\", \"position\": \"CTO\", \"industry\": \"Software house\"}\n```"
            }
        }]
    });
    let (server, mut requests) = stub_server(vec![(200, reply.to_string())]).await;
    let provider = OpenAiVisionProvider::new("sk-test".to_string())
        .with_base_url(format!("{server}/"))
        .with_retry(RetryPolicy::none());

    let outcome = CardScanner::new(provider).scan(&image()).await.unwrap();
    assert_eq!(outcome.source, ExtractionSource::Structured);
    assert_eq!(outcome.card.name.as_deref(), Some("Jane Doe"));
    assert_eq!(outcome.card.title.as_deref(), Some("CTO"));
    assert_eq!(
        outcome.card.industry.as_deref(),
        Some("Technology & Software")
    );

    let request = requests.recv().await.unwrap();
    assert!(request.starts_with("post /chat/completions http/1.1"));
    assert!(request.contains("authorization: bearer sk-test"));
    assert!(request.contains(r#""model":"gpt-4o-mini""#));
    assert!(request.contains("data:image/png;base64,"));
    assert!(request.contains(r#""detail":"high""#));
}

#[tokio::test]
async fn vision_request_is_retried() {
    let reply = serde_json::json!({
        "choices": [{ "message": { "content": "Jane Doe\njane@acme.com" } }]
    });
    let (server, _requests) = stub_server(vec![
        (500, r#"{"error":"overloaded"}"#.to_string()),
        (200, reply.to_string()),
    ])
    .await;
    let retry = RetryPolicy {
        base_delays: vec![Duration::from_millis(1)],
        final_retries: 1,
        final_delay: Duration::from_millis(1),
    };
    let provider = OpenAiVisionProvider::new("sk-test".to_string())
        .with_base_url(server)
        .with_retry(retry);

    let outcome = CardScanner::new(provider).scan(&image()).await.unwrap();
    assert_eq!(outcome.source, ExtractionSource::Heuristic);
    assert_eq!(outcome.card.email.as_deref(), Some("jane@acme.com"));
}

#[tokio::test]
async fn vision_failure_carries_context() {
    let (server, _requests) = stub_server(vec![(
        401,
        r#"{"error":{"code":"invalid_api_key"}}"#.to_string(),
    )])
    .await;
    let provider = OpenAiVisionProvider::new("sk-bad".to_string())
        .with_base_url(server)
        .with_retry(RetryPolicy::none());

    let err = CardScanner::new(provider).scan(&image()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to extract text from image");
    assert!(format!("{err:#}").contains("invalid_api_key"));
}
