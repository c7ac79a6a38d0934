//! Response envelope shared by every handler.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope. Handlers wrap their
/// payloads in this rather than building ad-hoc JSON objects.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
