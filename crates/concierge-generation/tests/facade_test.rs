//! Facade fallback behaviour and backend wire formats.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use concierge_core::errors::GenerationError;
use concierge_core::models::{BackendSlot, GenerationRequest};
use concierge_core::traits::IGenerationBackend;
use concierge_generation::{GeminiBackend, GenerationFacade, OpenAiCompatibleBackend};
use proptest::prelude::*;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

// ---------------------------------------------------------------------------
// Scripted backends
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
enum Behaviour {
    Succeed,
    Fail,
    Hang,
    Offline,
}

struct Scripted {
    name: &'static str,
    behaviour: Behaviour,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(name: &'static str, behaviour: Behaviour) -> Arc<Self> {
        Arc::new(Self {
            name,
            behaviour,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IGenerationBackend for Scripted {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Succeed => Ok(format!("{} says: {}", self.name, request.prompt)),
            Behaviour::Fail => Err(GenerationError::RequestFailed {
                backend: self.name.to_string(),
                reason: "scripted failure".to_string(),
            }),
            Behaviour::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok("too late".to_string())
            }
            Behaviour::Offline => unreachable!("offline backend must not be called"),
        }
    }

    fn name(&self) -> &str {
        self.name
    }

    fn is_available(&self) -> bool {
        !matches!(self.behaviour, Behaviour::Offline)
    }
}

fn facade(primary: &Arc<Scripted>, secondary: &Arc<Scripted>) -> GenerationFacade {
    GenerationFacade::new(
        primary.clone(),
        secondary.clone(),
        Duration::from_millis(100),
    )
}

fn request() -> GenerationRequest {
    GenerationRequest::new("hello", 50, 0.3)
}

#[tokio::test]
async fn primary_success_does_not_touch_secondary() {
    let primary = Scripted::new("groq", Behaviour::Succeed);
    let secondary = Scripted::new("gemini", Behaviour::Succeed);
    let facade = facade(&primary, &secondary);

    let out = facade.generate(&request()).await.unwrap();
    assert_eq!(out.backend_used, BackendSlot::Primary);
    assert!(!out.fallback_used);
    assert_eq!(out.text, "groq says: hello");
    assert_eq!(secondary.calls(), 0);

    let stats = facade.stats();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.primary_success, 1);
    assert_eq!(stats.success_rate, 1.0);
    assert_eq!(stats.fallback_rate, 0.0);
}

#[tokio::test]
async fn primary_failure_falls_back_once() {
    let primary = Scripted::new("groq", Behaviour::Fail);
    let secondary = Scripted::new("gemini", Behaviour::Succeed);
    let facade = facade(&primary, &secondary);

    let out = facade.generate(&request()).await.unwrap();
    assert_eq!(out.backend_used, BackendSlot::Secondary);
    assert!(out.fallback_used);
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 1);

    let stats = facade.stats();
    assert_eq!(stats.primary_failure, 1);
    assert_eq!(stats.secondary_success, 1);
    assert_eq!(stats.fallback_rate, 1.0);
}

#[tokio::test]
async fn primary_timeout_falls_back() {
    let primary = Scripted::new("groq", Behaviour::Hang);
    let secondary = Scripted::new("gemini", Behaviour::Succeed);
    let facade = facade(&primary, &secondary);

    let out = facade.generate(&request()).await.unwrap();
    assert_eq!(out.backend_used, BackendSlot::Secondary);
    assert!(out.latency_ms >= 100.0);
}

#[tokio::test]
async fn unavailable_primary_is_skipped_and_counted() {
    let primary = Scripted::new("groq", Behaviour::Offline);
    let secondary = Scripted::new("gemini", Behaviour::Succeed);
    let facade = facade(&primary, &secondary);

    let out = facade.generate(&request()).await.unwrap();
    assert!(out.fallback_used);
    assert_eq!(facade.stats().primary_failure, 1);
}

#[tokio::test]
async fn both_down_returns_none() {
    let primary = Scripted::new("groq", Behaviour::Fail);
    let secondary = Scripted::new("gemini", Behaviour::Hang);
    let facade = facade(&primary, &secondary);

    assert!(facade.generate(&request()).await.is_none());
    let stats = facade.stats();
    assert_eq!(stats.total_failures, 1);
    assert_eq!(stats.secondary_failure, 1);
}

#[tokio::test]
async fn reset_clears_counters() {
    let primary = Scripted::new("groq", Behaviour::Succeed);
    let secondary = Scripted::new("gemini", Behaviour::Succeed);
    let facade = facade(&primary, &secondary);
    facade.generate(&request()).await;
    facade.reset_stats();
    assert_eq!(facade.stats().total_requests, 0);
}

#[tokio::test]
async fn concurrent_calls_keep_counters_consistent() {
    let primary = Scripted::new("groq", Behaviour::Succeed);
    let secondary = Scripted::new("gemini", Behaviour::Succeed);
    let facade = Arc::new(facade(&primary, &secondary));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let f = facade.clone();
        handles.push(tokio::spawn(async move { f.generate(&request()).await }));
    }
    for h in handles {
        assert!(h.await.unwrap().is_some());
    }
    let stats = facade.stats();
    assert_eq!(stats.total_requests, 32);
    assert_eq!(stats.primary_success, 32);
}

proptest! {
    #[test]
    fn outcomes_account_for_every_request(
        script in proptest::collection::vec((any::<bool>(), any::<bool>()), 1..12)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let mut total = 0u64;
            let mut successes = 0u64;
            let mut failures = 0u64;
            for (primary_ok, secondary_ok) in &script {
                let primary = Scripted::new("p", if *primary_ok { Behaviour::Succeed } else { Behaviour::Fail });
                let secondary = Scripted::new("s", if *secondary_ok { Behaviour::Succeed } else { Behaviour::Fail });
                let facade = facade(&primary, &secondary);
                let out = facade.generate(&request()).await;
                let stats = facade.stats();
                total += stats.total_requests;
                successes += stats.primary_success + stats.secondary_success;
                failures += stats.total_failures;
                prop_assert_eq!(out.is_some(), *primary_ok || *secondary_ok);
            }
            prop_assert_eq!(total, successes + failures);
            Ok(())
        })?;
    }
}

// ---------------------------------------------------------------------------
// Wire formats against a local canned-response server
// ---------------------------------------------------------------------------

/// Serve exactly one HTTP exchange and hand back the raw request.
async fn serve_once(status: u16, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if request_complete(&buf) {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf).into_owned()
    });
    (format!("http://{addr}"), handle)
}

fn request_complete(buf: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buf);
    let Some(split) = text.find("\r\n\r\n") else {
        return false;
    };
    let headers = text[..split].to_ascii_lowercase();
    let length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    buf.len() >= split + 4 + length
}

#[tokio::test]
async fn openai_backend_sends_messages_and_reads_choice() {
    let (base, server) = serve_once(
        200,
        r#"{"choices":[{"message":{"role":"assistant","content":"  You saved 3 items.  "}}]}"#,
    )
    .await;
    let backend =
        OpenAiCompatibleBackend::new(&base, "llama-3.3-70b-versatile", Some("k".into())).unwrap();
    let req = GenerationRequest::new("Data: 3", 300, 0.3).with_system("Use only the data.");

    let text = backend.generate(&req).await.unwrap();
    assert_eq!(text, "You saved 3 items.");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /chat/completions"));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer k"));
    assert!(raw.contains(r#""role":"system""#));
    assert!(raw.contains(r#""max_tokens":300"#));
}

#[tokio::test]
async fn openai_backend_maps_http_errors() {
    let (base, _server) = serve_once(429, r#"{"error":"rate limited"}"#).await;
    let backend = OpenAiCompatibleBackend::new(&base, "m", Some("k".into())).unwrap();
    let err = backend.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::HttpStatus { status: 429, .. }));
}

#[tokio::test]
async fn openai_backend_without_key_fails_fast() {
    let backend = OpenAiCompatibleBackend::new("http://127.0.0.1:9", "m", None).unwrap();
    assert!(!backend.is_available());
    let err = backend.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::NotConfigured { .. }));
}

#[tokio::test]
async fn gemini_backend_reads_first_candidate() {
    let (base, server) = serve_once(
        200,
        r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Refunds within 48 hours."}]}}]}"#,
    )
    .await;
    let backend = GeminiBackend::new(&base, "gemini-1.5-flash", Some("secret".into())).unwrap();

    let text = backend.generate(&request()).await.unwrap();
    assert_eq!(text, "Refunds within 48 hours.");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /models/gemini-1.5-flash:generateContent?key=secret"));
    assert!(raw.contains(r#""maxOutputTokens":50"#));
}

#[tokio::test]
async fn gemini_empty_candidates_is_empty_completion() {
    let (base, _server) = serve_once(200, r#"{"candidates":[]}"#).await;
    let backend = GeminiBackend::new(&base, "m", Some("k".into())).unwrap();
    let err = backend.generate(&request()).await.unwrap_err();
    assert!(matches!(err, GenerationError::EmptyCompletion { .. }));
}
