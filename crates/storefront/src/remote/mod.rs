//! Typed JSON clients for the remote deployment.
//!
//! Two services back the remote variant: the auth service (registration,
//! login, profile and admin listings) and the main service (products). The
//! only local state they touch is the logged-in pointer, which a successful
//! remote login or registration sets.
//!
//! A non-success response becomes [`RemoteError::Api`] carrying the
//! server's `mensaje` text, ready to show to the user.

pub mod auth;
pub mod catalog;
pub mod models;

pub use auth::AuthApi;
pub use catalog::CatalogApi;

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::store::StoreError;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Message used when an error body carries no `mensaje`.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Error desconocido";

/// Message used when an error body is not a JSON object.
pub const UNREADABLE_ERROR_MESSAGE: &str = "Error al procesar respuesta del servidor";

/// Errors that can occur when calling the remote services.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An authenticated endpoint was called without a token.
    #[error("no active session")]
    NoSession,

    /// An endpoint path could not be joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The session pointer could not be written.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl RemoteError {
    /// Text suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(e) => format!("Error de conexión: {e}"),
            Self::NoSession => "No hay sesión activa".to_string(),
            Self::Parse(_) => UNREADABLE_ERROR_MESSAGE.to_string(),
            Self::Url(_) | Self::Store(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Extract the user-facing message from an error response body.
///
/// Uses the body's `mensaje` field, [`UNKNOWN_ERROR_MESSAGE`] when there is
/// no body or no `mensaje`, and [`UNREADABLE_ERROR_MESSAGE`] when the body is
/// not a JSON object.
#[must_use]
pub fn parse_error_message(body: Option<&str>) -> String {
    let Some(body) = body else {
        return UNKNOWN_ERROR_MESSAGE.to_string();
    };

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => match fields.get("mensaje") {
            Some(serde_json::Value::String(message)) => message.clone(),
            None | Some(serde_json::Value::Null) => UNKNOWN_ERROR_MESSAGE.to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            Some(_) => UNREADABLE_ERROR_MESSAGE.to_string(),
        },
        _ => UNREADABLE_ERROR_MESSAGE.to_string(),
    }
}

/// Resolve a server image path (e.g. `/uploads/box.jpg`) against `base`.
///
/// # Errors
///
/// Returns `RemoteError::Url` if the path cannot be joined.
pub fn image_url(base: &Url, path: &str) -> Result<Url, RemoteError> {
    Ok(base.join(path.trim_start_matches('/'))?)
}

fn http_client() -> Result<reqwest::Client, RemoteError> {
    Ok(reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Turn a non-success response into `RemoteError::Api`.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.ok();
    let message = parse_error_message(body.as_deref());
    tracing::warn!(status = status.as_u16(), %message, "remote call failed");
    Err(RemoteError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Check the response and decode its JSON body.
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RemoteError> {
    check(response)
        .await?
        .json()
        .await
        .map_err(|e| RemoteError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_server {
    //! One-shot HTTP responder for client tests.

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;
    use url::Url;

    /// Serve `responses` in order, one connection each. The handle yields
    /// the raw requests received.
    pub(crate) async fn serve(
        responses: Vec<(u16, &'static str)>,
    ) -> (Url, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                requests.push(read_request(&mut socket).await);
                let response = format!(
                    "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
            requests
        });

        (Url::parse(&format!("http://{addr}/")).unwrap(), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0_u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body_len = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}
