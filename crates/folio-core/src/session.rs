//! Chat session controller
//!
//! Owns the transcript and the busy flag. Rendering layers drive it through
//! `begin_send` / `PendingExchange::run` / `finish`, or through `send` when
//! they can simply await the whole cycle.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::ai::{CompletionBackend, CompletionRequest};
use crate::error::{ChatError, ErrorKind};
use crate::profile;
use crate::state::{ChatMessage, Transcript};

pub const GREETING: &str =
    "Terminal initialized. Neural link established. How can I assist you with Arthony's portfolio today?";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a send did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    Empty,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Rejected(Rejected),
    Replied,
    Failed(ErrorKind),
}

/// An accepted message waiting on the completion service.
#[derive(Debug)]
pub struct PendingExchange {
    request: CompletionRequest,
}

/// Result of a finished exchange, ready to be applied to the session.
#[derive(Debug)]
pub struct Settled {
    result: Result<String, ChatError>,
}

impl Settled {
    pub fn result(&self) -> &Result<String, ChatError> {
        &self.result
    }
}

impl PendingExchange {
    pub fn request(&self) -> &CompletionRequest {
        &self.request
    }

    /// Issues exactly one outbound call. A call that outlives `timeout` is
    /// reported as `ChatError::Timeout` so the session never stays busy.
    pub async fn run(self, backend: &dyn CompletionBackend, timeout: Duration) -> Settled {
        let result = match tokio::time::timeout(timeout, backend.complete(&self.request)).await {
            Ok(result) => result,
            Err(_) => Err(ChatError::Timeout(timeout)),
        };
        Settled { result }
    }
}

pub struct ChatSession {
    transcript: Transcript,
    busy: bool,
    system_instruction: String,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_system_instruction(profile::system_instruction())
    }

    pub fn with_system_instruction(system_instruction: &str) -> Self {
        Self {
            transcript: Transcript::new(),
            busy: false,
            system_instruction: system_instruction.to_string(),
        }
    }

    /// Seed the transcript with an opening assistant line.
    pub fn with_greeting(mut self, greeting: &str) -> Self {
        self.transcript.push(ChatMessage::assistant(greeting));
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Appends the user message and marks the session busy. Blank input and
    /// input arriving while a reply is outstanding leave everything untouched.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingExchange, Rejected> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank chat input");
            return Err(Rejected::Empty);
        }
        if self.busy {
            debug!("ignoring chat input while a reply is pending");
            return Err(Rejected::Busy);
        }

        self.transcript.push(ChatMessage::user(text));
        self.busy = true;
        info!(chars = text.chars().count(), "chat message accepted");

        Ok(PendingExchange {
            request: CompletionRequest {
                system_instruction: self.system_instruction.clone(),
                user_text: text.to_string(),
            },
        })
    }

    /// Appends exactly one assistant message and clears the busy flag.
    pub fn finish(&mut self, settled: Settled) -> SendOutcome {
        self.busy = false;
        match settled.result {
            Ok(text) => {
                self.transcript.push(ChatMessage::assistant(text));
                SendOutcome::Replied
            }
            Err(err) => {
                let kind = err.kind();
                warn!(error = %err, ?kind, "chat completion failed");
                self.transcript.push(ChatMessage::assistant(kind.fallback_message()));
                SendOutcome::Failed(kind)
            }
        }
    }

    pub async fn send(&mut self, backend: &dyn CompletionBackend, text: &str, timeout: Duration) -> SendOutcome {
        match self.begin_send(text) {
            Ok(exchange) => {
                let settled = exchange.run(backend, timeout).await;
                self.finish(settled)
            }
            Err(rejected) => SendOutcome::Rejected(rejected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ChatRole;

    #[test]
    fn test_begin_send_trims_and_appends_user_message() {
        let mut session = ChatSession::with_system_instruction("sys");
        let exchange = session.begin_send("  hello there \n").unwrap();

        assert!(session.is_busy());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().messages()[0], ChatMessage::user("hello there"));
        assert_eq!(exchange.request().user_text, "hello there");
        assert_eq!(exchange.request().system_instruction, "sys");
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut session = ChatSession::with_system_instruction("sys");
        assert_eq!(session.begin_send("   \t").unwrap_err(), Rejected::Empty);
        assert_eq!(session.begin_send("").unwrap_err(), Rejected::Empty);
        assert!(session.transcript().is_empty());
        assert!(!session.is_busy());
    }

    #[test]
    fn test_finish_failure_appends_fallback() {
        let mut session = ChatSession::with_system_instruction("sys");
        let _exchange = session.begin_send("hi").unwrap();
        let outcome = session.finish(Settled { result: Err(ChatError::MissingCredential) });

        assert_eq!(outcome, SendOutcome::Failed(ErrorKind::Authentication));
        assert!(!session.is_busy());
        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.text, crate::error::AUTH_FAILURE_MESSAGE);
    }

    #[test]
    fn test_greeting_seeds_transcript() {
        let session = ChatSession::new().with_greeting(GREETING);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript().messages()[0].role, ChatRole::Assistant);
    }
}
