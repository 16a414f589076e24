use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use folio_core::error::{AUTH_FAILURE_MESSAGE, CONNECTIVITY_MESSAGE, SAFETY_FILTER_MESSAGE};
use folio_core::{
    ChatError, ChatRole, ChatSession, CompletionBackend, CompletionRequest, ErrorKind, GeminiClient,
    Rejected, SendOutcome,
};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Records every request and answers from a fixed script.
struct ScriptedBackend {
    calls: AtomicUsize,
    seen: Mutex<Vec<CompletionRequest>>,
    reply: fn(&CompletionRequest) -> Result<String, ChatError>,
}

impl ScriptedBackend {
    fn new(reply: fn(&CompletionRequest) -> Result<String, ChatError>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            reply,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        (self.reply)(request)
    }
}

struct HangingBackend;

#[async_trait]
impl CompletionBackend for HangingBackend {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ChatError> {
        std::future::pending().await
    }
}

fn echo(request: &CompletionRequest) -> Result<String, ChatError> {
    Ok(format!("echo: {}", request.user_text))
}

#[tokio::test]
async fn test_each_send_cycle_adds_two_messages() {
    let backend = ScriptedBackend::new(echo);
    let mut session = ChatSession::with_system_instruction("sys");

    for (i, text) in ["projects?", "stack?", "contact?"].iter().enumerate() {
        let outcome = session.send(&backend, text, TIMEOUT).await;
        assert_eq!(outcome, SendOutcome::Replied);
        assert_eq!(session.transcript().len(), 2 * (i + 1));
    }

    let messages = session.transcript().messages();
    assert_eq!(messages[4].role, ChatRole::User);
    assert_eq!(messages[4].text, "contact?");
    assert_eq!(messages[5].role, ChatRole::Assistant);
    assert_eq!(messages[5].text, "echo: contact?");
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_blank_send_leaves_transcript_unchanged() {
    let backend = ScriptedBackend::new(echo);
    let mut session = ChatSession::with_system_instruction("sys");

    for text in ["", "   ", "\n\t "] {
        let outcome = session.send(&backend, text, TIMEOUT).await;
        assert_eq!(outcome, SendOutcome::Rejected(Rejected::Empty));
    }
    assert!(session.transcript().is_empty());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_send_while_busy_is_a_no_op() {
    let backend = ScriptedBackend::new(echo);
    let mut session = ChatSession::with_system_instruction("sys");

    let pending = session.begin_send("first").unwrap();
    assert_eq!(session.transcript().len(), 1);

    let outcome = session.send(&backend, "second", TIMEOUT).await;
    assert_eq!(outcome, SendOutcome::Rejected(Rejected::Busy));
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(backend.calls(), 0);

    let settled = pending.run(&backend, TIMEOUT).await;
    assert_eq!(session.finish(settled), SendOutcome::Replied);
    assert_eq!(backend.calls(), 1);
    assert_eq!(session.transcript().len(), 2);
}

#[tokio::test]
async fn test_only_latest_message_is_sent() {
    let backend = ScriptedBackend::new(echo);
    let mut session = ChatSession::with_system_instruction("profile context");

    session.send(&backend, "who is he?", TIMEOUT).await;
    session.send(&backend, "and his projects?", TIMEOUT).await;

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].user_text, "and his projects?");
    assert_eq!(seen[1].system_instruction, "profile context");
    assert!(!seen[1].user_text.contains("who is he?"));
    assert!(!seen[1].system_instruction.contains("who is he?"));
}

#[tokio::test]
async fn test_default_session_grounds_on_profile() {
    let backend = ScriptedBackend::new(echo);
    let mut session = ChatSession::new();
    session.send(&backend, "hi", TIMEOUT).await;

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen[0].system_instruction, folio_core::profile::system_instruction());
}

#[tokio::test]
async fn test_missing_credential_shows_auth_message() {
    let backend = GeminiClient::new("gemini-2.5-flash")
        .with_base_url("http://127.0.0.1:9")
        .with_key_vars(&["FOLIO_SESSION_TEST_UNSET_KEY"]);
    let mut session = ChatSession::with_system_instruction("sys");

    let outcome = session.send(&backend, "hello", TIMEOUT).await;

    assert_eq!(outcome, SendOutcome::Failed(ErrorKind::Authentication));
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(session.transcript().last().unwrap().text, AUTH_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_safety_rejection_shows_safety_message() {
    let backend = ScriptedBackend::new(|_| Err(ChatError::ContentBlocked { reason: "SAFETY".into() }));
    let mut session = ChatSession::with_system_instruction("sys");

    let outcome = session.send(&backend, "something spicy", TIMEOUT).await;

    assert_eq!(outcome, SendOutcome::Failed(ErrorKind::Safety));
    assert_eq!(session.transcript().last().unwrap().text, SAFETY_FILTER_MESSAGE);
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_other_failures_show_connectivity_message() {
    let backend = ScriptedBackend::new(|_| Err(ChatError::Http { status: 500, body: "oops".into() }));
    let mut session = ChatSession::with_system_instruction("sys");

    session.send(&backend, "hello", TIMEOUT).await;
    assert_eq!(session.transcript().last().unwrap().text, CONNECTIVITY_MESSAGE);

    // No automatic retry: the user resends by hand
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hung_call_times_out_and_clears_busy() {
    let backend: Arc<dyn CompletionBackend> = Arc::new(HangingBackend);
    let mut session = ChatSession::with_system_instruction("sys");

    let outcome = session.send(backend.as_ref(), "anyone there?", Duration::from_secs(30)).await;

    assert_eq!(outcome, SendOutcome::Failed(ErrorKind::Connectivity));
    assert!(!session.is_busy());
    assert_eq!(session.transcript().len(), 2);

    let outcome = session.send(backend.as_ref(), "retrying", Duration::from_secs(30)).await;
    assert_eq!(outcome, SendOutcome::Failed(ErrorKind::Connectivity));
    assert_eq!(session.transcript().len(), 4);
}
