//! Error types for the shape editing engine.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons an edit request is refused before anything is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// No base (source) version or entity was chosen.
    #[error("형상정보를 선택해주세요.")]
    NoBaseSelected,

    /// The copy has nowhere to go.
    #[error("덮어쓸 대상을 선택해주세요.")]
    NoTargetSelected,

    /// A whole-version copy needs to know which version to replace.
    #[error("타겟 리모델링 타입을 선택해주세요.")]
    TargetVersionUnspecified,

    /// A surface cannot be its own neighbour.
    #[error("surface '{id}' cannot be adjacent to itself")]
    SelfLink { id: String },

    /// The pair fails the wall/floor/ceiling eligibility rule.
    #[error("surface '{target}' cannot be linked to '{origin}': {reason}")]
    IneligibleLink {
        origin: String,
        target: String,
        reason: String,
    },

    /// Caller contract violation: the floor id exists in no version.
    #[error("unknown floor '{id}'")]
    UnknownFloor { id: String },

    /// Caller contract violation: the zone id exists in no version.
    #[error("unknown zone '{id}'")]
    UnknownZone { id: String },

    /// Caller contract violation: the surface id exists in no version.
    #[error("unknown surface '{id}'")]
    UnknownSurface { id: String },
}

impl EditError {
    /// True for failures that mean the caller passed ids it never obtained
    /// from the current document.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnknownFloor { .. } | Self::UnknownZone { .. } | Self::UnknownSurface { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Error,
    Success,
}

/// Structured outcome handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationReport {
    pub status: Status,
    pub message: String,
}

impl OperationReport {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn from_result<T>(result: &Result<T, EditError>, success_message: &str) -> Self {
        match result {
            Ok(_) => Self::success(success_message),
            Err(e) => e.into(),
        }
    }
}

impl From<&EditError> for OperationReport {
    fn from(error: &EditError) -> Self {
        Self::error(error.to_string())
    }
}

/// Errors that can occur when loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read the document from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not a valid shape document.
    #[error("invalid document '{path}': {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
