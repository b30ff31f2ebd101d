use super::BackendError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

/// A file the user picked. Only the reference is held; the size is looked up
/// off the UI thread and the bytes are read when the upload is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            path,
            name,
            size: None,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The multipart payload for one upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Body of `GET /api/document/<name>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentDetail {
    pub filename: String,
    pub structured_data: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Xml,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Json, ExportFormat::Xml];

    /// Value of the `format` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Xml => "xml",
        }
    }

    pub fn extension(self) -> &'static str {
        self.query_value()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("JSON"),
            ExportFormat::Xml => f.write_str("XML"),
        }
    }
}

/// A machine-readable export; `text` is already formatted by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedDocument {
    pub filename: String,
    pub format: ExportFormat,
    pub text: String,
}

impl TransformedDocument {
    /// `report.pdf` exported as XML saves as `report.pdf_processed.xml`.
    pub fn default_file_name(&self) -> String {
        format!("{}_processed.{}", self.filename, self.format.extension())
    }
}

/// Outcome of a spawned task, delivered to the UI thread.
#[derive(Debug)]
pub enum BackendEvent {
    DocumentsLoaded(Result<Vec<String>, BackendError>),
    UploadFinished(Result<Value, BackendError>),
    DocumentLoaded(Result<DocumentDetail, BackendError>),
    DocumentTransformed(Result<TransformedDocument, BackendError>),
    FileSized { path: PathBuf, size: Option<u64> },
    Saved(Result<PathBuf, BackendError>),
}

impl BackendEvent {
    /// Network round trips, as opposed to local disk work.
    pub fn is_request(&self) -> bool {
        !matches!(self, BackendEvent::FileSized { .. } | BackendEvent::Saved(_))
    }
}
