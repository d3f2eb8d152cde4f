use serde::{Serialize, Serializer};

/// Machine-readable error codes carried in failure responses.
///
/// The discriminants are the wire contract: they stay stable across
/// releases and are independent of whatever the OS error string said.
/// New codes append; existing ones are never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    Internal = 0,
    Filesystem = 1,
    NotADirectory = 2,
    AlreadyExists = 3,
    NotFound = 4,
    PermissionDenied = 5,
    NotPermitted = 6,
    Validation = 7,
}

impl Serialize for Errno {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(*self as u16)
    }
}

/// Response envelope shared by every endpoint.
///
/// Success: `{"success": true, ...payload}` with the payload flattened
/// in. Failure: `{"success": false, "message": ..., "errno": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errno: Option<Errno>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            errno: None,
            data,
        }
    }
}

impl ApiResponse<Empty> {
    pub fn failure(errno: Errno, message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            errno: Some(errno),
            data: Empty {},
        }
    }
}

/// Payload for responses that carry nothing beyond the success marker.
#[derive(Debug, Serialize)]
pub struct Empty {}
