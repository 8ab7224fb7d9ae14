//! Live backend tests
//!
//! Need the library backend on localhost:8080 with its seeded accounts.

use library_admin::{
    config::StorageBackend,
    models::{BookFilter, LoanFilter, Role},
    shell::Screen,
    AppConfig, AppError, AppState,
};

fn live_state() -> AppState {
    let mut config = AppConfig::default();
    config.storage.backend = StorageBackend::Memory;
    AppState::from_config(config).expect("Failed to build client")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_backend_reachable() {
    let state = live_state();
    assert!(state.session.api().ping().await);
}

#[tokio::test]
#[ignore]
async fn test_admin_login() {
    let state = live_state();

    let user = state
        .session
        .login("admin", "admin123")
        .await
        .expect("Login failed");

    assert_eq!(user.role, Role::Admin);
    assert!(state.session.is_admin());
    assert!(state.session.validate_token().await);
    assert_eq!(state.navigate("/users"), Screen::Users);
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let state = live_state();

    let err = state
        .session
        .login("admin", "wrong")
        .await
        .expect_err("Login should be refused");

    assert!(matches!(err, AppError::Authentication(_) | AppError::Unauthorized(_)));
    assert!(!state.session.is_authenticated());
}

#[tokio::test]
#[ignore]
async fn test_librarian_cannot_list_users() {
    let state = live_state();
    state
        .session
        .login("librarian", "lib123")
        .await
        .expect("Login failed");

    let err = state.services.users.list().await.expect_err("Users should be admin only");
    assert!(matches!(err, AppError::Forbidden(_) | AppError::Unauthorized(_)));
}

#[tokio::test]
#[ignore]
async fn test_catalog_and_loans() {
    let state = live_state();
    state
        .session
        .login("librarian", "lib123")
        .await
        .expect("Login failed");

    let books = state
        .services
        .books
        .list(&BookFilter::default())
        .await
        .expect("Failed to list books");
    let counts = state.services.books.counts().await.expect("Failed to count books");
    assert!(counts.available_books <= counts.total_books);
    assert!(books.iter().all(|book| book.total_copies >= book.available_copies));

    state
        .services
        .loans
        .list(LoanFilter::Active)
        .await
        .expect("Failed to list loans");
    state
        .services
        .dashboard
        .stats()
        .await
        .expect("Failed to load dashboard");
}

#[tokio::test]
#[ignore]
async fn test_logout() {
    let state = live_state();
    state
        .session
        .login("admin", "admin123")
        .await
        .expect("Login failed");

    state.session.logout().await;
    assert!(!state.session.is_authenticated());
    assert_eq!(state.current_screen(), Screen::Login);
}
