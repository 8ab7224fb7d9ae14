//! Data models exchanged with the library backend

pub mod book;
pub mod loan;
pub mod member;
pub mod response;
pub mod session;
pub mod stats;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookCounts, BookFilter, BookForm};
pub use loan::{Loan, LoanFilter, LoanForm, LoanStats};
pub use member::{Member, MemberForm};
pub use response::ApiEnvelope;
pub use session::{Session, SessionState};
pub use stats::DashboardStats;
pub use user::{Role, UserAccount, UserProfile};
