use std::time::Duration;

use nrvenest_profile_api::{
    clients::{
        openai::{OpenAiClient, MAX_TOKENS},
        Completer,
    },
    config::Config,
    models::prompt::SYSTEM_INSTRUCTION,
    AppError,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Raw request as seen by the fake upstream: lowercased head plus body.
struct Captured {
    head: String,
    body: Value,
}

struct Reply {
    status: &'static str,
    content_type: &'static str,
    body: String,
    delay: Duration,
}

impl Reply {
    fn json(status: &'static str, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }
}

fn completion(choices: Value) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_700_000_000u64,
        "model": "gpt-3.5-turbo",
        "choices": choices,
        "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}
    })
}

async fn read_request(socket: &mut TcpStream) -> Option<Captured> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let len = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while buf.len() < end + 4 + len {
                let n = socket.read(&mut chunk).await.ok()?;
                if n == 0 {
                    return None;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let body = serde_json::from_slice(&buf[end + 4..end + 4 + len]).unwrap_or(Value::Null);
            return Some(Captured { head, body });
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Serves `reply` to every connection and forwards each request it receives.
async fn fake_upstream(reply: Reply) -> (String, mpsc::UnboundedReceiver<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let Some(captured) = read_request(&mut socket).await else {
                continue;
            };
            let _ = tx.send(captured);
            tokio::time::sleep(reply.delay).await;
            let resp = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                reply.status,
                reply.content_type,
                reply.body.len(),
                reply.body
            );
            let _ = socket.write_all(resp.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}/v1/"), rx)
}

fn client_for(base_url: &str, timeout_secs: &str) -> OpenAiClient {
    let config = Config::from_lookup(|key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_BASE_URL" => Some(base_url.to_string()),
        "UPSTREAM_TIMEOUT_SECS" => Some(timeout_secs.to_string()),
        _ => None,
    })
    .unwrap();
    OpenAiClient::new(&config)
}

#[tokio::test]
async fn successful_reply_is_trimmed() {
    let (base_url, mut requests) = fake_upstream(Reply::json(
        "200 OK",
        completion(json!([{
            "index": 0,
            "message": {"role": "assistant", "content": "  hello  "},
            "finish_reason": "stop"
        }])),
    ))
    .await;

    let text = client_for(&base_url, "5").complete("describe me").await.unwrap();
    assert_eq!(text, "hello");

    let sent = requests.recv().await.unwrap();
    assert!(sent.head.starts_with("post ") && sent.head.contains("/chat/completions"), "{}", sent.head);
    assert!(sent.head.contains("authorization: bearer sk-test"));
    assert_eq!(sent.body["model"], "gpt-3.5-turbo");
    assert_eq!(sent.body["max_tokens"], json!(MAX_TOKENS));
    let temperature = sent.body["temperature"].as_f64().unwrap();
    assert!((temperature - 0.7).abs() < 1e-6);
    assert_eq!(sent.body["messages"][0]["role"], "system");
    assert_eq!(sent.body["messages"][0]["content"], SYSTEM_INSTRUCTION);
    assert_eq!(sent.body["messages"][1]["role"], "user");
    assert_eq!(sent.body["messages"][1]["content"], "describe me");
}

#[tokio::test]
async fn empty_choice_list_is_upstream_error() {
    let (base_url, _requests) = fake_upstream(Reply::json("200 OK", completion(json!([])))).await;

    let res = client_for(&base_url, "5").complete("describe me").await;
    assert!(matches!(res, Err(AppError::Upstream(_))), "{res:?}");
}

#[tokio::test]
async fn rejected_key_is_upstream_error() {
    let (base_url, _requests) = fake_upstream(Reply::json(
        "401 Unauthorized",
        json!({"error": {
            "message": "bad key",
            "type": "invalid_request_error",
            "param": null,
            "code": "invalid_api_key"
        }}),
    ))
    .await;

    let res = client_for(&base_url, "5").complete("describe me").await;
    assert!(matches!(res, Err(AppError::Upstream(_))), "{res:?}");
}

#[tokio::test]
async fn server_error_page_is_upstream_error() {
    let (base_url, _requests) = fake_upstream(Reply {
        status: "500 Internal Server Error",
        content_type: "text/html",
        body: "<html><body>upstream exploded</body></html>".to_string(),
        delay: Duration::ZERO,
    })
    .await;

    let res = client_for(&base_url, "5").complete("describe me").await;
    assert!(matches!(res, Err(AppError::Upstream(_))), "{res:?}");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let (base_url, _requests) = fake_upstream(Reply {
        delay: Duration::from_secs(10),
        ..Reply::json("200 OK", completion(json!([])))
    })
    .await;

    let started = std::time::Instant::now();
    let res = client_for(&base_url, "1").complete("describe me").await;
    match res {
        Err(AppError::Upstream(detail)) => assert!(detail.contains("1s"), "{detail}"),
        other => panic!("expected timeout, got {other:?}"),
    }
    assert!(started.elapsed() < Duration::from_secs(5));
}
