use std::path::PathBuf;

use crate::error::{AppError, AppResult, HttpError, ValidationError};

/// Marker prefix selecting a file-backed request body.
const FILE_MARKER: char = '@';

/// Where the request body comes from: the flag value itself, or a file
/// named after the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BodySpec {
    Literal(String),
    FileRef(PathBuf),
}

impl BodySpec {
    /// Classify a raw `-d` argument. A bare marker with no path is invalid;
    /// anything without the marker is literal content, empty string included.
    pub(crate) fn from_arg(raw: &str) -> Result<Self, ValidationError> {
        match raw.strip_prefix(FILE_MARKER) {
            None => Ok(BodySpec::Literal(raw.to_owned())),
            Some("") => Err(ValidationError::BodyFilePathEmpty),
            Some(path) => Ok(BodySpec::FileRef(PathBuf::from(path))),
        }
    }

    /// Resolve into final body content, reading the whole file for
    /// `FileRef`. The read is a single attempt; I/O errors carry the path.
    pub(crate) fn resolve(self) -> AppResult<String> {
        match self {
            BodySpec::Literal(content) => Ok(content),
            BodySpec::FileRef(path) => std::fs::read_to_string(&path)
                .map_err(|err| AppError::http(HttpError::ReadBodyFile { path, source: err })),
        }
    }
}

pub(crate) fn resolve_request_body(raw: &str) -> AppResult<String> {
    BodySpec::from_arg(raw)?.resolve()
}
