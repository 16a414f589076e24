pub mod ai;
pub mod boot;
pub mod error;
pub mod profile;
pub mod session;
pub mod showcase;
pub mod state;

// Re-export main types for convenience
pub use ai::{CompletionBackend, CompletionRequest, GeminiClient};
pub use boot::{spawn_boot, BootEvent, BootHandle, BootPhase, BootScript, BootSequence};
pub use error::{ChatError, ErrorKind};
pub use session::{ChatSession, PendingExchange, Rejected, SendOutcome, Settled};
pub use state::{ChatMessage, ChatRole, Transcript};
