//! Loopback HTTP listener for the OAuth2 consent redirect.
//!
//! Accepts connections on `127.0.0.1` until one GET request carries a
//! `code` (or an `error`), answers it with a small HTML page, and returns
//! the query parameters.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::debug;

use crate::error::CalendarError;

const SUCCESS_HTML: &str = "<!DOCTYPE html><html><head><title>watari</title></head>\
<body style=\"font-family: system-ui; text-align: center; padding: 60px 20px;\">\
<h2>Calendar access granted</h2><p>You can close this tab.</p></body></html>";

/// Parameters received from the consent redirect.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Wait for the redirect on an already-bound listener.
pub(crate) async fn wait_for_callback(
    listener: &TcpListener,
    wait: Duration,
) -> Result<CallbackParams, CalendarError> {
    timeout(wait, accept_loop(listener))
        .await
        .map_err(|_| CalendarError::ConsentTimedOut)?
}

async fn accept_loop(listener: &TcpListener) -> Result<CallbackParams, CalendarError> {
    loop {
        let (stream, addr) = listener
            .accept()
            .await
            .map_err(|e| CalendarError::Io(format!("failed to accept redirect: {}", e)))?;
        debug!("Consent redirect connection from {}", addr);

        if let Some(result) = handle_connection(stream).await {
            return result;
        }
    }
}

/// Returns `None` when the request was not the redirect and we should keep listening.
async fn handle_connection(mut stream: TcpStream) -> Option<Result<CallbackParams, CalendarError>> {
    let mut buf = vec![0u8; 8192];
    let n = match stream.read(&mut buf).await {
        Ok(n) => n,
        Err(e) => {
            debug!("Failed to read redirect request: {}", e);
            return None;
        }
    };
    let request = String::from_utf8_lossy(&buf[..n]);

    let target = match parse_request_target(&request) {
        Some(target) => target,
        None => {
            let _ = stream.write_all(b"HTTP/1.1 400 Bad Request\r\n\r\n").await;
            return None;
        }
    };

    let params = parse_query(target);
    let lookup = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    if let Some(error) = lookup("error") {
        respond(&mut stream, "<h2>Authorization failed</h2>").await;
        return Some(Err(CalendarError::Auth(format!(
            "consent was denied: {}",
            error
        ))));
    }

    match lookup("code") {
        Some(code) if !code.is_empty() => {
            respond(&mut stream, SUCCESS_HTML).await;
            Some(Ok(CallbackParams {
                code,
                state: lookup("state").unwrap_or_default(),
            }))
        }
        _ => {
            // Browsers also ask for /favicon.ico and the like.
            let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\n\r\n").await;
            None
        }
    }
}

async fn respond(stream: &mut TcpStream, html: &str) {
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        html.len(),
        html
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.flush().await;
}

/// Extract the request target from a `GET <target> HTTP/1.1` request line.
fn parse_request_target(request: &str) -> Option<&str> {
    let mut parts = request.lines().next()?.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("GET"), Some(target)) => Some(target),
        _ => None,
    }
}

fn parse_query(target: &str) -> Vec<(String, String)> {
    match target.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => Vec::new(),
    }
}
