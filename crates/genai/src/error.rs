//! Error type shared by the generative-service clients, plus the HTTP
//! response helpers both clients build on.

/// Errors from the generative REST clients.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response parsed but did not contain the expected payload.
    #[error("Unexpected response shape: {0}")]
    Response(String),

    /// An image payload could not be base64-decoded.
    #[error("Failed to decode image payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or a [`GenAiError::Api`] containing the status
/// and body text on failure.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, GenAiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(GenAiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Parse a successful JSON response body into the expected type.
pub(crate) async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, GenAiError> {
    let response = ensure_success(response).await?;
    Ok(response.json::<T>().await?)
}
