//! Session lifecycle: login, logout, expiry and role checks

pub mod claims;
pub mod events;
pub mod guard;

pub use claims::TokenClaims;
pub use events::{LogoutReason, SessionEvent, SessionEvents};
pub use guard::SessionGuard;
