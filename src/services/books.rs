//! Catalog (books) service

use serde_json::{json, Value};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    http::ApiClient,
    models::{ApiEnvelope, Book, BookCounts, BookFilter, BookForm},
};

#[derive(Clone)]
pub struct BooksService {
    api: ApiClient,
}

impl BooksService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// List books, narrowed by the first filter set
    pub async fn list(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let envelope: ApiEnvelope<Vec<Book>> =
            self.api.get_with_query("/books", filter.query()).await?;
        Ok(envelope.into_list())
    }

    pub async fn get(&self, id: i64) -> AppResult<Book> {
        let envelope: ApiEnvelope<Book> = self.api.get(&format!("/books/{}", id)).await?;
        envelope.into_data("Book")
    }

    pub async fn create(&self, form: &BookForm) -> AppResult<Book> {
        form.validate()?;
        let envelope: ApiEnvelope<Book> = self.api.post("/books", form).await?;
        let book = envelope.into_data("Book")?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(book)
    }

    pub async fn update(&self, id: i64, form: &BookForm) -> AppResult<Book> {
        form.validate()?;
        let envelope: ApiEnvelope<Book> = self.api.put(&format!("/books/{}", id), form).await?;
        envelope.into_data("Book")
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let _: ApiEnvelope<Value> = self.api.delete(&format!("/books/{}", id)).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Keyword search over title, author and ISBN
    pub async fn search(&self, keyword: &str) -> AppResult<Vec<Book>> {
        let query = vec![("keyword".to_string(), keyword.trim().to_string())];
        let envelope: ApiEnvelope<Vec<Book>> =
            self.api.get_with_query("/books/search", query).await?;
        Ok(envelope.into_list())
    }

    /// Books with at least one copy on the shelf
    pub async fn available(&self) -> AppResult<Vec<Book>> {
        let envelope: ApiEnvelope<Vec<Book>> = self.api.get("/books/available").await?;
        Ok(envelope.into_list())
    }

    pub async fn counts(&self) -> AppResult<BookCounts> {
        let envelope: ApiEnvelope<BookCounts> = self.api.get("/books/count").await?;
        envelope.into_data("Book counts")
    }

    /// Change the number of copies owned; the backend adjusts availability
    pub async fn update_copies(&self, id: i64, total_copies: i32) -> AppResult<Book> {
        if total_copies < 0 {
            return Err(AppError::Validation(
                "Total copies cannot be negative".to_string(),
            ));
        }
        let envelope: ApiEnvelope<Book> = self
            .api
            .patch(
                &format!("/books/{}/copies", id),
                &json!({ "totalCopies": total_copies }),
            )
            .await?;
        envelope.into_data("Book")
    }
}
