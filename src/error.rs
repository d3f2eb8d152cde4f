use crate::response::{ApiResponse, Errno};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

/// Failure taxonomy for every operation outcome.
///
/// Each variant carries the human-readable message; the stable wire code
/// comes from [`Errno`]. Errors are translated exactly once, at the point
/// of catch (`From<io::Error>` below or an explicit constructor), and
/// propagate unchanged to the response boundary. Nothing in between logs
/// or retries.
#[derive(Debug)]
pub enum AppError {
    Internal(String),
    Filesystem(String),
    NotADirectory(String),
    AlreadyExists(String),
    NotFound(String),
    PermissionDenied(String),
    NotPermitted(String),
    Validation(String),
}

impl AppError {
    pub fn errno(&self) -> Errno {
        match self {
            AppError::Internal(_) => Errno::Internal,
            AppError::Filesystem(_) => Errno::Filesystem,
            AppError::NotADirectory(_) => Errno::NotADirectory,
            AppError::AlreadyExists(_) => Errno::AlreadyExists,
            AppError::NotFound(_) => Errno::NotFound,
            AppError::PermissionDenied(_) => Errno::PermissionDenied,
            AppError::NotPermitted(_) => Errno::NotPermitted,
            AppError::Validation(_) => Errno::Validation,
        }
    }

    fn into_message(self) -> String {
        match self {
            AppError::Internal(msg)
            | AppError::Filesystem(msg)
            | AppError::NotADirectory(msg)
            | AppError::AlreadyExists(msg)
            | AppError::NotFound(msg)
            | AppError::PermissionDenied(msg)
            | AppError::NotPermitted(msg)
            | AppError::Validation(msg) => msg,
        }
    }
}

impl std::error::Error for AppError {}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
            AppError::Filesystem(msg) => write!(f, "filesystem error: {}", msg),
            AppError::NotADirectory(msg) => write!(f, "not a directory: {}", msg),
            AppError::AlreadyExists(msg) => write!(f, "already exists: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "permission denied: {}", msg),
            AppError::NotPermitted(msg) => write!(f, "operation not permitted: {}", msg),
            AppError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Parameter problems are the client's fault; everything else is
        // reported as a server-side failure. Clients dispatch on `errno`,
        // not on the HTTP status.
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let errno = self.errno();
        let body = Json(ApiResponse::failure(errno, self.into_message()));

        (status, body).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        // EPERM and EACCES both collapse into ErrorKind::PermissionDenied;
        // only the raw errno tells them apart.
        #[cfg(unix)]
        if err.raw_os_error() == Some(libc::EPERM) {
            return AppError::NotPermitted(err.to_string());
        }

        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            std::io::ErrorKind::NotADirectory => AppError::NotADirectory(err.to_string()),
            std::io::ErrorKind::AlreadyExists => AppError::AlreadyExists(err.to_string()),
            std::io::ErrorKind::PermissionDenied => AppError::PermissionDenied(err.to_string()),
            _ => AppError::Filesystem(err.to_string()),
        }
    }
}
