//! Resource services against a scripted backend

use chrono::NaiveDate;
use reqwest::Method;
use rust_decimal::Decimal;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use library_admin::{
    models::{
        user::{GenerateUserForm, UserForm},
        BookFilter, BookForm, LoanFilter, LoanForm, MemberForm, Role,
    },
    services::ResourceScreen,
    AppError,
};

use crate::common::{harness, profile};

fn book(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "author": "Jane Austen",
        "isbn": "9780141439518",
        "genre": "Fiction",
        "totalCopies": 3,
        "availableCopies": 2,
        "createdAt": "2024-01-15T10:30:00"
    })
}

fn loan(id: i64, due: &str) -> serde_json::Value {
    json!({
        "id": id,
        "book": book(1, "Emma"),
        "member": {"id": 4, "firstName": "Ada", "lastName": "Lovelace", "email": "ada@library.com"},
        "loanDate": "2024-03-01",
        "dueDate": due,
        "returned": false,
        "fineAmount": 0.0,
        "isOverdue": false,
        "daysOverdue": 0
    })
}

#[tokio::test]
async fn test_book_list_sends_filters() {
    let h = harness();
    h.store.set("tok", &profile("librarian", Role::Librarian)).unwrap();
    h.transport.respond_data(json!([book(1, "Emma"), book(2, "Persuasion")]));

    let filter = BookFilter {
        author: Some("Austen".to_string()),
        genre: Some("  ".to_string()),
        available: Some(true),
        ..Default::default()
    };
    let books = assert_ok!(h.state.services.books.list(&filter).await);

    assert_eq!(books.len(), 2);
    assert_eq!(books[1].title, "Persuasion");
    assert_eq!(books[0].borrowed_copies(), 1);
    let request = h.transport.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.url, "http://localhost:8080/api/books");
    assert_eq!(
        request.query,
        vec![
            ("author".to_string(), "Austen".to_string()),
            ("available".to_string(), "true".to_string())
        ]
    );
}

#[tokio::test]
async fn test_invalid_book_form_is_not_sent() {
    let h = harness();
    let form = BookForm {
        title: String::new(),
        author: "Someone".to_string(),
        ..Default::default()
    };

    let err = assert_err!(h.state.services.books.create(&form).await);
    assert!(matches!(err, AppError::Validation(ref m) if m == "Title is required"));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn test_create_then_refetch() {
    let h = harness();
    h.transport.respond_data(book(3, "Sanditon"));
    h.transport.respond_data(json!([book(1, "Emma"), book(3, "Sanditon")]));

    let form = BookForm {
        title: "Sanditon".to_string(),
        author: "Jane Austen".to_string(),
        total_copies: 3,
        available_copies: 3,
        ..Default::default()
    };
    let books = h.state.services.books.clone();
    let filter = BookFilter::default();
    let mut screen = ResourceScreen::default();
    let created = screen
        .submit(books.create(&form), || books.list(&filter))
        .await
        .unwrap();

    assert_eq!(created.id, 3);
    assert_eq!(screen.items.len(), 2);
    let requests = h.transport.requests();
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].body.as_ref().unwrap()["totalCopies"], 3);
    assert_eq!(requests[1].method, Method::GET);
}

#[tokio::test]
async fn test_backend_rejection_reaches_screen() {
    let h = harness();
    h.transport.respond(
        400,
        json!({"success": false, "message": "Failed to create book: ISBN already exists"}),
    );

    let form = BookForm {
        title: "Emma".to_string(),
        author: "Jane Austen".to_string(),
        ..Default::default()
    };
    let books = h.state.services.books.clone();
    let filter = BookFilter::default();
    let mut screen = ResourceScreen::default();
    let created = screen
        .submit(books.create(&form), || books.list(&filter))
        .await;

    assert!(created.is_none());
    assert_eq!(
        screen.error.as_deref(),
        Some("Failed to create book: ISBN already exists")
    );
    assert_eq!(h.transport.requests().len(), 1);
}

#[tokio::test]
async fn test_book_counts_and_copies() {
    let h = harness();
    h.transport
        .respond_data(json!({"totalBooks": 10, "availableBooks": 7, "borrowedBooks": 3}));
    h.transport.respond_data(book(1, "Emma"));

    let counts = h.state.services.books.counts().await.unwrap();
    assert_eq!(counts.borrowed_books, 3);

    h.state.services.books.update_copies(1, 5).await.unwrap();
    let request = h.transport.last_request();
    assert_eq!(request.method, Method::PATCH);
    assert!(request.url.ends_with("/books/1/copies"));
    assert_eq!(request.body, Some(json!({"totalCopies": 5})));

    assert_err!(h.state.services.books.update_copies(1, -1).await);
    assert_eq!(h.transport.requests().len(), 2);
}

#[tokio::test]
async fn test_missing_record_data() {
    let h = harness();
    h.transport.respond(200, json!({"success": true, "message": "OK"}));

    let err = assert_err!(h.state.services.books.get(9).await);
    assert!(matches!(err, AppError::Internal(_)));
}

#[tokio::test]
async fn test_not_found() {
    let h = harness();
    h.transport.respond(404, json!({"message": "Member not found with id: 9"}));

    let err = assert_err!(h.state.services.members.get(9).await);
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Member not found with id: 9"));
}

#[tokio::test]
async fn test_member_search_and_lookup() {
    let h = harness();
    h.transport.respond_data(json!([
        {"id": 4, "firstName": "Ada", "lastName": "Lovelace", "membershipId": "LIB004"}
    ]));
    h.transport.respond_data(json!({"id": 4, "firstName": "Ada", "lastName": "Lovelace"}));
    h.transport.respond_data(json!(42));

    let found = h.state.services.members.list(Some(" ada ")).await.unwrap();
    assert_eq!(found[0].full_name(), "Ada Lovelace");
    assert_eq!(
        h.transport.last_request().query,
        vec![("search".to_string(), "ada".to_string())]
    );

    h.state.services.members.by_membership_id("LIB004").await.unwrap();
    assert!(h.transport.last_request().url.ends_with("/members/membership/LIB004"));

    assert_eq!(h.state.services.members.count().await.unwrap(), 42);
}

#[tokio::test]
async fn test_member_lookup_escapes_path_values() {
    let h = harness();
    h.transport.respond_data(json!({"id": 7, "firstName": "Liam", "lastName": "O'Brien"}));
    h.transport.respond_data(json!({"id": 7, "firstName": "Liam", "lastName": "O'Brien"}));

    h.state.services.members.by_email("o#brien@library.com").await.unwrap();
    let url = reqwest::Url::parse(&h.transport.last_request().url).unwrap();
    assert_eq!(url.path(), "/api/members/email/o%23brien@library.com");
    assert!(url.fragment().is_none());

    h.state.services.members.by_membership_id("LIB/007?x").await.unwrap();
    let url = reqwest::Url::parse(&h.transport.last_request().url).unwrap();
    assert_eq!(url.path(), "/api/members/membership/LIB%2F007%3Fx");
    assert!(url.query().is_none());
}

#[tokio::test]
async fn test_member_form_validation() {
    let h = harness();
    let form = MemberForm {
        first_name: "Ada".to_string(),
        last_name: String::new(),
        email: Some("not-an-email".to_string()),
        ..Default::default()
    };

    let err = assert_err!(h.state.services.members.create(&form).await);
    let message = err.user_message();
    assert!(message.contains("Last name is required"));
    assert!(message.contains("Email should be valid"));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn test_loan_lifecycle() {
    let h = harness();
    h.transport.respond_data(loan(11, "2024-03-15"));
    h.transport.respond_data(loan(11, "2024-03-29"));
    h.transport.respond_data(json!({
        "id": 11, "dueDate": "2024-03-29", "returned": true, "returnDate": "2024-03-20"
    }));

    let form = LoanForm {
        book_id: 1,
        member_id: 4,
        due_date: None,
        notes: None,
    };
    let created = h.state.services.loans.create(&form).await.unwrap();
    assert_eq!(created.due_date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    assert_eq!(
        h.transport.last_request().body,
        Some(json!({"bookId": 1, "memberId": 4}))
    );

    let renewed = h
        .state
        .services
        .loans
        .renew(11, NaiveDate::from_ymd_opt(2024, 3, 29))
        .await
        .unwrap();
    assert!(renewed.is_overdue_on(NaiveDate::from_ymd_opt(2024, 3, 30).unwrap()));
    assert_eq!(
        h.transport.last_request().body,
        Some(json!({"dueDate": "2024-03-29"}))
    );

    let returned = h.state.services.loans.return_loan(11).await.unwrap();
    assert!(returned.returned);
    let request = h.transport.last_request();
    assert_eq!(request.method, Method::POST);
    assert!(request.url.ends_with("/loans/11/return"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_loan_filters_and_stats() {
    let h = harness();
    h.transport.respond_data(json!([loan(1, "2024-01-01")]));
    h.transport.respond_data(json!([]));
    h.transport
        .respond_data(json!({"activeLoans": 5, "overdueLoans": 1, "totalFines": 2.5}));

    let overdue = h.state.services.loans.list(LoanFilter::Overdue).await.unwrap();
    assert_eq!(overdue.len(), 1);
    assert_eq!(
        h.transport.last_request().query,
        vec![("overdue".to_string(), "true".to_string())]
    );

    h.state.services.loans.by_member(4, true).await.unwrap();
    let request = h.transport.last_request();
    assert!(request.url.ends_with("/loans/member/4"));
    assert_eq!(request.query, vec![("active".to_string(), "true".to_string())]);

    let stats = h.state.services.loans.stats().await.unwrap();
    assert_eq!(stats.active_loans, 5);
    assert_eq!(stats.total_fines, Decimal::new(25, 1));
}

#[tokio::test]
async fn test_loan_form_requires_selection() {
    let h = harness();
    let form = LoanForm {
        book_id: 0,
        member_id: 4,
        due_date: None,
        notes: None,
    };
    let err = assert_err!(h.state.services.loans.create(&form).await);
    assert_eq!(err.user_message(), "A book must be selected");
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn test_user_management() {
    let h = harness();
    h.store.set("tok", &profile("admin", Role::Admin)).unwrap();
    h.transport.respond_data(json!([
        {"id": 1, "username": "admin", "role": "ROLE_ADMIN", "active": true},
        {"id": 3, "username": "johnsmith", "role": "ROLE_USER", "systemGenerated": true}
    ]));
    h.transport.respond_data(json!({
        "id": 5, "username": "janed", "password": "Lib@x1y2z3w4",
        "email": "jane@library.com", "fullName": "Jane Doe", "role": "ROLE_LIBRARIAN"
    }));
    h.transport.respond_data(json!({"id": 5, "username": "janed", "active": false}));
    h.transport.respond(200, json!({"success": true, "message": "Password reset successfully", "data": null}));

    let users = h.state.services.users.list().await.unwrap();
    assert_eq!(users[0].role, Role::Admin);
    assert!(users[1].system_generated);

    let generated = h
        .state
        .services
        .users
        .generate(&GenerateUserForm {
            full_name: "Jane Doe".to_string(),
            email: "jane@library.com".to_string(),
            role: Role::Librarian,
        })
        .await
        .unwrap();
    assert_eq!(generated.username, "janed");
    assert_eq!(h.transport.last_request().body.unwrap()["role"], "ROLE_LIBRARIAN");

    let deactivated = h.state.services.users.deactivate(5).await.unwrap();
    assert!(!deactivated.active);
    assert_eq!(h.transport.last_request().method, Method::PATCH);

    h.state.services.users.reset_password(5, " newpass ").await.unwrap();
    let request = h.transport.last_request();
    assert!(request.url.ends_with("/users/5/password"));
    assert_eq!(request.body, Some(json!({"newPassword": "newpass"})));
    assert_eq!(h.transport.pending(), 0);
}

#[tokio::test]
async fn test_user_form_validation() {
    let h = harness();
    let form = UserForm {
        username: "jd".to_string(),
        password: None,
        email: "jd@library.com".to_string(),
        full_name: "J D".to_string(),
        role: Role::User,
    };
    let err = assert_err!(h.state.services.users.create(&form).await);
    assert!(matches!(err, AppError::Validation(_)));
    assert_err!(h.state.services.users.reset_password(5, "   ").await);
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn test_dashboard_stats() {
    let h = harness();
    h.transport.respond_data(json!({
        "totalBooks": 120, "availableBooks": 100, "borrowedBooks": 20,
        "totalMembers": 45, "totalUsers": 4, "activeLoans": 20,
        "overdueLoans": 3, "totalFines": 12.75
    }));

    let stats = h.state.services.dashboard.stats().await.unwrap();
    assert_eq!(stats.total_members, 45);
    assert_eq!(stats.total_fines, Decimal::new(1275, 2));
    assert!(h.transport.last_request().url.ends_with("/dashboard/stats"));
}

#[tokio::test]
async fn test_server_down_is_connectivity() {
    let h = harness();
    h.transport.fail("No response from server: connection refused");

    let err = assert_err!(h.state.services.dashboard.stats().await);
    assert!(matches!(err, AppError::Connectivity(_)));
    assert!(err.user_message().contains("connection refused"));
}
