//! Backend API gateway
//!
//! Every backend call goes through [`ApiClient`]: it attaches the stored
//! bearer token, classifies failures and tears the session down when the
//! backend answers 401.

use std::sync::Arc;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::transport::{HttpRequest, ReqwestTransport, Transport};
use crate::{
    config::ApiConfig,
    error::{AppError, AppResult},
    session::events::{LogoutReason, SessionEvent, SessionEvents},
    shell::Navigator,
    storage::TokenStore,
};

const NO_RESPONSE_MESSAGE: &str =
    "No response from server. Please check that the backend is running.";

/// Request as issued by a caller, relative to the API base
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> AppResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, params: Vec<(String, String)>) -> Self {
        self.query.extend(params);
        self
    }

    /// Explicit header; the client never replaces it
    pub fn header(mut self, name: HeaderName, value: &str) -> AppResult<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| AppError::Validation(format!("Invalid value for header {}: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }
}

/// `prefix` followed by each value as a single percent-encoded path segment
pub fn encoded_path(prefix: &str, segments: &[&str]) -> AppResult<String> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| AppError::Internal(format!("Failed to build path: {}", e)))?;
    url.set_path(prefix);
    url.path_segments_mut()
        .map_err(|_| AppError::Internal("Failed to build path".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.path().to_string())
}

/// Map a non-2xx answer onto the error taxonomy
pub fn classify(status: StatusCode, body: &str) -> AppError {
    let server = server_message(body);
    let message = |fallback: &str| server.clone().unwrap_or_else(|| fallback.to_string());

    match status.as_u16() {
        401 => AppError::Unauthorized(message("Session expired. Please log in again.")),
        403 => AppError::Forbidden(message("Access denied")),
        404 => AppError::NotFound(message("Requested resource not found")),
        code if code >= 500 => AppError::ServerFault {
            status: code,
            message: message("Server error. Please try again later."),
        },
        code => AppError::Rejected {
            status: code,
            message: message(&format!("Request failed with status {}", code)),
        },
    }
}

/// `message` field of a JSON error body, else its `error` field
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
    })
}

fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    transport: Arc<dyn Transport>,
    store: TokenStore,
    navigator: Arc<dyn Navigator>,
    events: SessionEvents,
}

impl ApiClient {
    pub fn new(
        config: ApiConfig,
        transport: Arc<dyn Transport>,
        store: TokenStore,
        navigator: Arc<dyn Navigator>,
        events: SessionEvents,
    ) -> Self {
        Self {
            config,
            transport,
            store,
            navigator,
            events,
        }
    }

    /// Client over the reqwest transport, using the configured timeout
    pub fn with_reqwest(
        config: ApiConfig,
        store: TokenStore,
        navigator: Arc<dyn Navigator>,
        events: SessionEvents,
    ) -> AppResult<Self> {
        let transport = ReqwestTransport::new(config.timeout())
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::new(config, Arc::new(transport), store, navigator, events))
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            format!("{}/", base)
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Final headers and URL. The token is read from the store here, so a
    /// logout that completed before this call is always honoured.
    pub fn build(&self, request: ApiRequest) -> AppResult<HttpRequest> {
        let mut headers = request.headers;

        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if !headers.contains_key(AUTHORIZATION) {
            let token = self.store.token().unwrap_or_else(|e| {
                tracing::warn!("Could not read stored token: {}", e);
                None
            });
            if let Some(token) = token {
                let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                    AppError::MalformedLocalState(
                        "Stored token is not a valid header value".to_string(),
                    )
                })?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(HttpRequest {
            method: request.method,
            url: self.url(&request.path),
            query: request.query,
            headers,
            body: request.body,
        })
    }

    /// Send a request and return the raw JSON body of a 2xx answer
    pub async fn send(&self, request: ApiRequest) -> AppResult<Value> {
        let method = request.method.clone();
        let path = request.path.clone();
        let http = self.build(request)?;

        tracing::debug!(
            "API request: {} {} (auth: {})",
            method,
            path,
            http.headers.contains_key(AUTHORIZATION)
        );

        let response = match self.transport.send(http).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("API request {} {} got no response: {}", method, path, e);
                let message = if e.0.trim().is_empty() {
                    NO_RESPONSE_MESSAGE.to_string()
                } else {
                    e.0
                };
                return Err(AppError::Connectivity(message));
            }
        };

        tracing::debug!("API response: {} {} -> {}", method, path, response.status);

        if response.status.is_success() {
            return Ok(parse_body(&response.body));
        }

        let error = classify(response.status, &response.body);
        tracing::warn!("API request {} {} failed: {}", method, path, error);

        if matches!(error, AppError::Unauthorized(_)) {
            self.end_rejected_session();
        }

        Err(error)
    }

    /// Send a request and deserialize the 2xx body
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> AppResult<T> {
        let value = self.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(ApiRequest::get(path)).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> AppResult<T> {
        self.execute(ApiRequest::get(path).query(query)).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::post(path).json(body)?).await
    }

    /// POST without a body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(ApiRequest::post(path)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(ApiRequest::patch(path)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        self.execute(ApiRequest::delete(path)).await
    }

    /// Whether the backend answers at all
    pub async fn ping(&self) -> bool {
        match self.send(ApiRequest::get("/")).await {
            Ok(_) => true,
            Err(AppError::Connectivity(e)) => {
                tracing::warn!("Backend unreachable: {}", e);
                false
            }
            Err(_) => true,
        }
    }

    fn end_rejected_session(&self) {
        let ended = self.store.clear().unwrap_or_else(|e| {
            tracing::error!("Failed to clear rejected session: {}", e);
            true
        });
        if ended {
            self.events.emit(SessionEvent::LoggedOut {
                reason: LogoutReason::Rejected,
            });
        }

        let login_path = &self.config.login_path;
        if !self.navigator.current_path().contains(login_path.as_str()) {
            tracing::info!("Redirecting to {}", login_path);
            self.navigator.redirect_to(login_path);
        }
    }
}
