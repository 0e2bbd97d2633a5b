use std::sync::Arc;
use std::time::Duration;

use crpt_api::CrptApi;
use crpt_api::CrptError;
use crpt_api::Document;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Minimal HTTP stub: answers every request with a fixed status and body,
/// reporting each served request on the returned channel.
async fn spawn_stub(status_line: &'static str, body: &'static str) -> (String, mpsc::UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let (socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let tx = tx.clone();
            tokio::spawn(async move {
                serve_one(socket, status_line, body, tx).await;
            });
        }
    });

    (format!("http://{addr}"), rx)
}

async fn serve_one(mut socket: TcpStream, status_line: &str, body: &str, tx: mpsc::UnboundedSender<()>) {
    let mut buf = vec![0u8; 65536];
    let mut read = 0;

    // Read the full request (headers plus content-length body) before
    // answering, so the client never sees a response mid-write.
    loop {
        let n = match socket.read(&mut buf[read..]).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        read += n;

        let Some(header_end) = buf[..read].windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") { value.trim().parse::<usize>().ok() } else { None }
            })
            .unwrap_or(0);

        let mut body_read = read - (header_end + 4);
        while body_read < content_length {
            match socket.read(&mut buf[read..]).await {
                Ok(0) | Err(_) => return,
                Ok(n) => {
                    read += n;
                    body_read += n;
                }
            }
        }
        break;
    }

    let _ = tx.send(());

    let response =
        format!("HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}", body.len());
    let _ = socket.write_all(response.as_bytes()).await;
}

#[tokio::test]
async fn submits_document_and_returns_body() {
    let (base_url, mut hits) = spawn_stub("200 OK", r#"{"value":"registered"}"#).await;

    let api = CrptApi::builder().requests_per_window(10).window(Duration::from_secs(60)).base_url(base_url).build().unwrap();

    let body = api.create_document(&Document::sample(), "signature").await.unwrap();

    assert_eq!(body, r#"{"value":"registered"}"#);
    assert!(hits.recv().await.is_some());
}

#[tokio::test]
async fn rejected_submission_carries_response_body() {
    let (base_url, mut hits) = spawn_stub("500 Internal Server Error", "server error").await;

    let api = CrptApi::builder().requests_per_window(10).window(Duration::from_secs(60)).base_url(base_url).build().unwrap();

    let err = api.create_document(&Document::sample(), "signature").await.unwrap_err();

    match err {
        CrptError::Rejected { status, body } => {
            assert_eq!(status.as_u16(), 500);
            assert!(body.contains("server error"));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    // Exactly one attempt, never retried
    assert!(hits.recv().await.is_some());
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(hits.try_recv().is_err());
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    // Bind then drop to get a port with nothing listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = CrptApi::builder()
        .requests_per_window(10)
        .window(Duration::from_secs(60))
        .base_url(format!("http://{addr}"))
        .build()
        .unwrap();

    let err = api.create_document(&Document::sample(), "signature").await.unwrap_err();
    assert!(matches!(err, CrptError::Transport(_)));
}

#[tokio::test(start_paused = true)]
async fn simulated_submissions_respect_window() {
    // Unroutable base URL: a network call would fail, success proves none
    // was made.
    let api = Arc::new(
        CrptApi::builder()
            .requests_per_window(2)
            .window(Duration::from_secs(1))
            .simulate(true)
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap(),
    );

    let started = tokio::time::Instant::now();
    let mut handles = Vec::new();
    for _ in 0..3 {
        let api = Arc::clone(&api);
        handles.push(tokio::spawn(async move {
            api.create_document(&Document::sample(), "signature").await.unwrap();
            started.elapsed()
        }));
    }

    let mut elapsed = Vec::new();
    for handle in handles {
        elapsed.push(handle.await.unwrap());
    }
    elapsed.sort();

    // Two callers pass within the first window, the third waits a full tick
    assert!(elapsed[0] < Duration::from_millis(50));
    assert!(elapsed[1] < Duration::from_millis(50));
    assert!(elapsed[2] >= Duration::from_secs(1));
}

#[tokio::test]
async fn simulated_submission_reports_success() {
    let api = CrptApi::builder().requests_per_window(1).window(Duration::from_secs(60)).simulate(true).build().unwrap();

    let body = api.create_document(&Document::sample(), "signature").await.unwrap();
    assert_eq!(body, "Document created successfully");
    assert_eq!(api.limiter().available(), 0);
}
