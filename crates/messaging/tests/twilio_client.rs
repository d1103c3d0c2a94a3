use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use auction_messaging::{MessageSender, MessagingError, TwilioClient, TwilioConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ---------------------------------------------------------------------------
// Scripted gateway
// ---------------------------------------------------------------------------

/// A local HTTP server that answers each POST with the next scripted
/// response, repeating the last one once the script runs out.
struct Gateway {
    url: String,
    posts: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl Gateway {
    async fn start(script: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let posts = Arc::new(AtomicUsize::new(0));
        let bodies = Arc::new(Mutex::new(Vec::new()));

        let (counter, seen) = (posts.clone(), bodies.clone());
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = script[n.min(script.len() - 1)];
                let request_body = read_request(&mut stream).await;
                seen.lock().unwrap().push(request_body);
                respond(stream, status, body).await;
            }
        });

        Self { url, posts, bodies }
    }

    fn posts(&self) -> usize {
        self.posts.load(Ordering::SeqCst)
    }

    fn client(&self) -> TwilioClient {
        TwilioClient::new(TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+14155238886".into(),
        })
        .unwrap()
        .with_base_url(&self.url)
        .with_retry_delays(vec![Duration::from_millis(10); 3])
    }
}

/// Read one request and return its body.
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return String::new();
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8_lossy(&buf[header_end..]).to_string()
}

async fn respond(mut stream: TcpStream, status: u16, body: &str) {
    let response = format!(
        "HTTP/1.1 {status} Scripted\r\ncontent-type: application/json\r\n\
         content-length: {}\r\nconnection: close\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.ok();
}

const QUEUED: &str = r#"{"sid":"SM1","to":"whatsapp:+15551234567","status":"queued"}"#;

// ---------------------------------------------------------------------------
// Accepted sends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn accepted_message_is_posted_once() {
    let gateway = Gateway::start(vec![(201, QUEUED)]).await;

    let sent = gateway.client().send("+15551234567", "hello").await.unwrap();

    assert_eq!(sent.sid, "SM1");
    assert_eq!(sent.status, "queued");
    assert_eq!(gateway.posts(), 1);

    let body = gateway.bodies.lock().unwrap()[0].clone();
    assert!(body.contains("To=whatsapp%3A%2B15551234567"));
    assert!(body.contains("From=whatsapp%3A%2B14155238886"));
    assert!(body.contains("Body=hello"));
}

#[tokio::test]
async fn accepted_response_without_recipient_uses_sent_address() {
    let gateway = Gateway::start(vec![(201, r#"{"sid":"SM1","status":"queued"}"#)]).await;

    let sent = gateway.client().send("+15551234567", "hi").await.unwrap();

    assert_eq!(sent.to, "whatsapp:+15551234567");
    assert_eq!(gateway.posts(), 1);
}

#[tokio::test]
async fn unreadable_accepted_response_is_not_resent() {
    let gateway = Gateway::start(vec![(201, "<html>queued</html>")]).await;

    let result = gateway.client().send("+15551234567", "hi").await;

    assert_matches!(result, Err(MessagingError::Decode(_)));
    assert_eq!(gateway.posts(), 1);
}

// ---------------------------------------------------------------------------
// Retry behaviour
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_errors_are_retried_until_the_attempt_cap() {
    let gateway = Gateway::start(vec![(500, r#"{"message":"upstream down"}"#)]).await;

    let result = gateway.client().send("+15551234567", "hi").await;

    assert_matches!(
        result,
        Err(MessagingError::HttpStatus { status: 500, ref message }) if message == "upstream down"
    );
    assert_eq!(gateway.posts(), 4);
}

#[tokio::test]
async fn server_error_then_success_returns_the_message() {
    let gateway = Gateway::start(vec![(503, "{}"), (429, "{}"), (201, QUEUED)]).await;

    let sent = gateway.client().send("+15551234567", "hi").await.unwrap();

    assert_eq!(sent.sid, "SM1");
    assert_eq!(gateway.posts(), 3);
}

#[tokio::test]
async fn client_error_gives_up_immediately() {
    let gateway = Gateway::start(vec![(
        400,
        r#"{"code":21211,"message":"The 'To' number is not a valid phone number."}"#,
    )])
    .await;

    let result = gateway.client().send("+1", "hi").await;

    assert_matches!(result, Err(MessagingError::HttpStatus { status: 400, .. }));
    assert_eq!(gateway.posts(), 1);
}
