//! Identity document metadata and submission validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Largest accepted document, in bytes.
pub const DOCUMENT_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Accepted file extensions, compared case-insensitively.
pub const DOCUMENT_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];
const FILE_NAME_MAX: usize = 255;

/// Validation errors raised while building a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentValidationError {
    #[error("file name must not be empty")]
    EmptyFileName,
    #[error("file name must be at most {max} characters")]
    FileNameTooLong { max: usize },
    #[error("invalid file type; only PDF, JPG, JPEG and PNG are allowed")]
    UnsupportedExtension,
    #[error("file must not be empty")]
    EmptyFile,
    #[error("file too large; the maximum allowed size is 10MB")]
    FileTooLarge,
    #[error("unknown document kind: {value}")]
    UnknownKind { value: String },
    #[error("unknown document status: {value}")]
    UnknownStatus { value: String },
}

/// Kinds of identity document a fan may submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    Rg,
    Cpf,
    Cnh,
    Passport,
}

impl DocumentKind {
    pub const ALL: [Self; 4] = [Self::Rg, Self::Cpf, Self::Cnh, Self::Passport];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rg => "RG",
            Self::Cpf => "CPF",
            Self::Cnh => "CNH",
            Self::Passport => "PASSPORT",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalised)
            .ok_or_else(|| DocumentValidationError::UnknownKind {
                value: s.to_owned(),
            })
    }
}

/// Classification outcome for a submitted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentStatus {
    Validated,
    Rejected,
}

impl DocumentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validated => "VALIDATED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = DocumentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALIDATED" => Ok(Self::Validated),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(DocumentValidationError::UnknownStatus {
                value: other.to_owned(),
            }),
        }
    }
}

/// Validated request to register a document.
///
/// ## Invariants
/// - `file_name` carries one of [`DOCUMENT_EXTENSIONS`].
/// - `size_bytes` lies in `1..=DOCUMENT_MAX_BYTES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSubmission {
    kind: DocumentKind,
    file_name: String,
    size_bytes: u64,
}

impl DocumentSubmission {
    /// Validate the extension first, then the size.
    ///
    /// # Examples
    /// ```
    /// use fanclub::domain::{DocumentKind, DocumentSubmission};
    ///
    /// assert!(DocumentSubmission::new(DocumentKind::Rg, "front.PNG", 2048).is_ok());
    /// assert!(DocumentSubmission::new(DocumentKind::Rg, "front.gif", 2048).is_err());
    /// ```
    pub fn new(
        kind: DocumentKind,
        file_name: impl Into<String>,
        size_bytes: u64,
    ) -> Result<Self, DocumentValidationError> {
        let file_name = file_name.into().trim().to_owned();
        if file_name.is_empty() {
            return Err(DocumentValidationError::EmptyFileName);
        }
        if file_name.chars().count() > FILE_NAME_MAX {
            return Err(DocumentValidationError::FileNameTooLong { max: FILE_NAME_MAX });
        }
        let supported = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            return Err(DocumentValidationError::UnsupportedExtension);
        }
        if size_bytes == 0 {
            return Err(DocumentValidationError::EmptyFile);
        }
        if size_bytes > DOCUMENT_MAX_BYTES {
            return Err(DocumentValidationError::FileTooLarge);
        }
        Ok(Self {
            kind,
            file_name,
            size_bytes,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Registered identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: DocumentKind,
    pub file_name: String,
    pub size_bytes: u64,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Build a document record from a classified submission.
    pub fn from_submission(
        user_id: UserId,
        submission: DocumentSubmission,
        status: DocumentStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        let DocumentSubmission {
            kind,
            file_name,
            size_bytes,
        } = submission;
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            file_name,
            size_bytes,
            status,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("scan.pdf")]
    #[case("scan.JPG")]
    #[case("photo.jpeg")]
    #[case(" front.png ")]
    fn accepts_supported_extensions(#[case] name: &str) {
        let submission =
            DocumentSubmission::new(DocumentKind::Cnh, name, 1024).expect("supported file");
        assert_eq!(submission.file_name(), name.trim());
    }

    #[rstest]
    #[case("scan.gif", 1024, DocumentValidationError::UnsupportedExtension)]
    #[case("no-extension", 1024, DocumentValidationError::UnsupportedExtension)]
    #[case("", 1024, DocumentValidationError::EmptyFileName)]
    #[case("scan.pdf", 0, DocumentValidationError::EmptyFile)]
    #[case("scan.pdf", DOCUMENT_MAX_BYTES + 1, DocumentValidationError::FileTooLarge)]
    #[case("scan.exe", DOCUMENT_MAX_BYTES + 1, DocumentValidationError::UnsupportedExtension)]
    fn rejects_invalid_submissions(
        #[case] name: &str,
        #[case] size: u64,
        #[case] expected: DocumentValidationError,
    ) {
        assert_eq!(
            DocumentSubmission::new(DocumentKind::Rg, name, size),
            Err(expected)
        );
    }

    #[rstest]
    fn size_limit_is_inclusive() {
        assert!(DocumentSubmission::new(DocumentKind::Rg, "a.pdf", DOCUMENT_MAX_BYTES).is_ok());
    }

    #[rstest]
    #[case("rg", DocumentKind::Rg)]
    #[case("Passport", DocumentKind::Passport)]
    fn kinds_parse_case_insensitively(#[case] raw: &str, #[case] expected: DocumentKind) {
        assert_eq!(raw.parse::<DocumentKind>(), Ok(expected));
    }
}
