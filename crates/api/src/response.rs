//! Shared response envelope for API handlers.
//!
//! Collection endpoints and composite views answer with `{ "data": ... }`.
//! Use [`DataResponse`] rather than ad-hoc `serde_json::json!({ "data": ... })`.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: courses }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
