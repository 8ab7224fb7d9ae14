//! Session transition feed
//!
//! Every change between anonymous and authenticated is published here,
//! including the implicit ones (expiry found during a check, 401 from the
//! backend, unreadable local state).

use tokio::sync::broadcast;

use crate::models::Role;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The user asked for it
    Explicit,
    /// The token's `exp` claim is in the past
    Expired,
    /// The backend refused the token (401/403)
    Rejected,
    /// Persisted slots could not be read back
    Corrupted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { username: String, role: Role },
    LoggedOut { reason: LogoutReason },
}

#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        match &event {
            SessionEvent::LoggedIn { username, role } => {
                tracing::info!("Session started for {} ({})", username, role);
            }
            SessionEvent::LoggedOut { reason } => {
                tracing::info!("Session ended: {:?}", reason);
            }
        }
        // no subscribers is fine
        let _ = self.sender.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
