//! Resource services: one per backend entity family

pub mod books;
pub mod dashboard;
pub mod loans;
pub mod members;
pub mod screen;
pub mod users;

use crate::http::ApiClient;

pub use screen::{submit_then_refetch, ResourceScreen};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
    pub members: members::MembersService,
    pub loans: loans::LoansService,
    pub users: users::UsersService,
    pub dashboard: dashboard::DashboardService,
}

impl Services {
    /// Create all services over the same client
    pub fn new(api: ApiClient) -> Self {
        Self {
            books: books::BooksService::new(api.clone()),
            members: members::MembersService::new(api.clone()),
            loans: loans::LoansService::new(api.clone()),
            users: users::UsersService::new(api.clone()),
            dashboard: dashboard::DashboardService::new(api),
        }
    }
}
