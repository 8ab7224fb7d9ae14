//! HTTP access to the library backend

pub mod client;
pub mod transport;

pub use client::{classify, encoded_path, server_message, ApiClient, ApiRequest};
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport, TransportError};
