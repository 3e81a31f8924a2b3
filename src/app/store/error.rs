//! Error taxonomy for document store calls.

use serde::Deserialize;

/// Error codes the store uses to qualify a rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    FolderNotFound,
    WorkingFolderNotFound,
    FileExists,
    Other(String),
}

impl ErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "folder_not_found" => ErrorCode::FolderNotFound,
            "working_folder_not_found" => ErrorCode::WorkingFolderNotFound,
            "file_exists" => ErrorCode::FileExists,
            other => ErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::FolderNotFound => "folder_not_found",
            ErrorCode::WorkingFolderNotFound => "working_folder_not_found",
            ErrorCode::FileExists => "file_exists",
            ErrorCode::Other(code) => code,
        }
    }

    fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::FolderNotFound | ErrorCode::WorkingFolderNotFound
        )
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure of a single store operation.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The store could not be reached or the connection failed mid-request
    Transport(String),
    /// The addressed document or folder does not exist
    NotFound {
        code: Option<ErrorCode>,
        message: String,
    },
    /// Create or rename collided with an existing path
    Conflict {
        code: Option<ErrorCode>,
        message: String,
    },
    /// Any other non-success response
    Rejected {
        status: u16,
        code: Option<ErrorCode>,
        message: String,
    },
    /// The response body could not be understood
    Decode(String),
    /// Rejected on the client before any request was made
    Validation(String),
}

impl StoreError {
    pub fn not_found(code: ErrorCode, message: impl Into<String>) -> Self {
        StoreError::NotFound {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn file_exists(path: &str) -> Self {
        StoreError::Conflict {
            code: Some(ErrorCode::FileExists),
            message: format!("'{}' already exists", path),
        }
    }

    /// Classify a non-success HTTP response.
    ///
    /// The code in the body wins over the status so a store that answers 400
    /// with `file_exists` is still reported as a conflict.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
        let code = parsed
            .as_ref()
            .and_then(|b| b.code.as_deref())
            .map(ErrorCode::parse);
        let message = parsed
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                let text = body.trim();
                if text.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    text.to_string()
                }
            });

        if matches!(code, Some(ErrorCode::FileExists)) {
            return StoreError::Conflict { code, message };
        }
        if code.as_ref().is_some_and(ErrorCode::is_not_found) {
            return StoreError::NotFound { code, message };
        }

        match status {
            404 => StoreError::NotFound { code, message },
            409 => StoreError::Conflict { code, message },
            _ => StoreError::Rejected {
                status,
                code,
                message,
            },
        }
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        match self {
            StoreError::NotFound { code, .. }
            | StoreError::Conflict { code, .. }
            | StoreError::Rejected { code, .. } => code.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }

    /// Text shown inline to the user. Conflicts carry the store's message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Transport(msg) => format!("Document store unreachable: {}", msg),
            StoreError::NotFound { message, .. } => format!("Not found: {}", message),
            StoreError::Conflict { message, .. } => message.clone(),
            StoreError::Rejected {
                status, message, ..
            } => format!("Store rejected the request ({}): {}", status, message),
            StoreError::Decode(msg) => format!("Unexpected response from store: {}", msg),
            StoreError::Validation(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Transport(msg) => write!(f, "transport error: {}", msg),
            StoreError::NotFound { code, message } => match code {
                Some(code) => write!(f, "not found ({}): {}", code, message),
                None => write!(f, "not found: {}", message),
            },
            StoreError::Conflict { code, message } => match code {
                Some(code) => write!(f, "conflict ({}): {}", code, message),
                None => write!(f, "conflict: {}", message),
            },
            StoreError::Rejected {
                status,
                code,
                message,
            } => match code {
                Some(code) => write!(f, "rejected with HTTP {} ({}): {}", status, code, message),
                None => write!(f, "rejected with HTTP {}: {}", status, message),
            },
            StoreError::Decode(msg) => write!(f, "decode error: {}", msg),
            StoreError::Validation(msg) => write!(f, "invalid request: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// Error body as sent by the store. Older stores put the text under `error`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default, alias = "error")]
    message: Option<String>,
}
