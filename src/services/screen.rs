//! List/create/update/delete flow shared by the resource screens

use std::future::Future;

use crate::error::{AppError, AppResult};

/// Await a mutation, then reload. The reload is not issued unless the
/// mutation succeeded.
pub async fn submit_then_refetch<T, R, S, F, Fut>(submit: S, refetch: F) -> AppResult<(T, R)>
where
    S: Future<Output = AppResult<T>>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<R>>,
{
    let saved = submit.await?;
    let reloaded = refetch().await?;
    Ok((saved, reloaded))
}

/// What a resource screen displays: the current rows and the last error
#[derive(Debug, Clone)]
pub struct ResourceScreen<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for ResourceScreen<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            error: None,
        }
    }
}

impl<T> ResourceScreen<T> {
    /// Replace the rows with a fetch result. On failure the previous rows stay.
    pub async fn load<Fut>(&mut self, fetch: Fut) -> bool
    where
        Fut: Future<Output = AppResult<Vec<T>>>,
    {
        match fetch.await {
            Ok(items) => {
                self.items = items;
                self.error = None;
                true
            }
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    /// Run a mutation and reload the rows once it has completed
    pub async fn submit<R, S, F, Fut>(&mut self, submit: S, refetch: F) -> Option<R>
    where
        S: Future<Output = AppResult<R>>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<Vec<T>>>,
    {
        match submit_then_refetch(submit, refetch).await {
            Ok((saved, items)) => {
                self.items = items;
                self.error = None;
                Some(saved)
            }
            Err(e) => {
                self.fail(&e);
                None
            }
        }
    }

    fn fail(&mut self, error: &AppError) {
        tracing::warn!("Screen operation failed: {}", error);
        self.error = Some(error.user_message());
    }
}
