//! Response envelope.

use serde::Serialize;

/// `{ "data": T }` envelope.
///
/// Export always answers with it; other note payloads only when the
/// envelope fault is switched on.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
