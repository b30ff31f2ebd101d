mod client;
mod error;
mod types;

use serde_json::Value;
use std::future::Future;

pub use client::HttpBackend;
pub use error::BackendError;
pub use types::{
    BackendEvent, DocumentDetail, ExportFormat, SelectedFile, TransformedDocument, UploadFile,
};

/// The calls the document view makes against the processing service.
///
/// Implementations are cloned into runtime tasks, so they should be cheap to
/// clone and safe to share across threads.
pub trait Backend: Clone + Send + Sync + 'static {
    /// `GET /api/documents`, returning the `documents` array in order.
    fn fetch_documents(&self) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send;

    /// `POST /api/upload` with the file as multipart field `file`.
    fn upload(&self, file: UploadFile) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `GET /api/document/<name>`: structured data of an already processed document.
    fn fetch_document(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<DocumentDetail, BackendError>> + Send;

    /// `GET /api/document/<name>/transform?format=...`
    fn transform_document(
        &self,
        name: &str,
        format: ExportFormat,
    ) -> impl Future<Output = Result<TransformedDocument, BackendError>> + Send;
}
