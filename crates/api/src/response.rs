//! Success-path response envelope.
//!
//! Every 2xx body is wrapped as `{ "data": ... }` so clients can branch on
//! the top-level key alone (errors carry `{ "error": ... }`, see
//! [`crate::error`]). Handlers build [`DataResponse`] directly rather than
//! reaching for `serde_json::json!`, which keeps payloads typed.

use serde::Serialize;

/// The `{ "data": T }` wrapper used by every successful handler.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
