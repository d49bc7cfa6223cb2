use serde::Deserialize;
use thiserror::Error;

/// SQLSTATE raised by Postgres on a unique/primary key collision.
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE raised by Postgres when a referenced row does not exist.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE used by `raise exception` inside plpgsql functions.
pub const RAISED_EXCEPTION: &str = "P0001";

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Invalid client configuration: {0}")]
    Configuration(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Error body PostgREST returns for rejected statements.
#[derive(Debug, Deserialize)]
pub(crate) struct PostgrestErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

impl DatabaseError {
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<PostgrestErrorBody>(body) {
            Ok(parsed) => DatabaseError::Api {
                status,
                code: parsed.code,
                message: parsed.message.unwrap_or_else(|| body.to_string()),
            },
            Err(_) => DatabaseError::Api {
                status,
                code: None,
                message: body.to_string(),
            },
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            DatabaseError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            DatabaseError::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code() == Some(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.code() == Some(FOREIGN_KEY_VIOLATION)
    }

    /// Business rule rejected inside a database function, e.g. `DUPLICATE_REVIEW`.
    pub fn raised(&self) -> Option<&str> {
        if self.code() == Some(RAISED_EXCEPTION) {
            self.message()
        } else {
            None
        }
    }
}
