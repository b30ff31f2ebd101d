use super::{Backend, BackendError, DocumentDetail, ExportFormat, TransformedDocument, UploadFile};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use tracing::debug;

const DOCUMENTS_PATH: &str = "/api/documents";
const UPLOAD_PATH: &str = "/api/upload";
const DOCUMENT_PATH: &str = "/api/document";
const TRANSFORM_ENDPOINT: &str = "/api/document/{name}/transform";

#[derive(Deserialize)]
struct DocumentsResponse {
    documents: Vec<String>,
}

#[derive(Deserialize)]
struct TransformResponse {
    filename: String,
    transformed_data: String,
}

/// `reqwest` implementation of [`Backend`] against a base URL such as
/// `http://localhost:5000`.
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpBackend {
    pub fn new(base_url: &str, auth_token: Option<&str>) -> Result<Self, BackendError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            // The service reads the raw token, no "Bearer" prefix.
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/api/document/<name>[/<suffix>]` with `name` percent-encoded as one
    /// path segment.
    fn document_url(&self, name: &str, suffix: Option<&str>) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.endpoint(DOCUMENT_PATH))
            .map_err(|e| BackendError::InvalidUrl(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| BackendError::InvalidUrl(self.base_url.clone()))?;
            segments.push(name);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    async fn send(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, BackendError> {
        let response = request.headers(self.headers.clone()).send().await?;
        let status = response.status();
        debug!(endpoint, %status, "backend responded");

        if !status.is_success() {
            return Err(BackendError::Status { endpoint, status });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Backend for HttpBackend {
    fn fetch_documents(&self) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send {
        let this = self.clone();
        async move {
            let url = this.endpoint(DOCUMENTS_PATH);
            debug!(%url, "fetching documents");
            let body = this.send(DOCUMENTS_PATH, this.client.get(&url)).await?;
            decode_documents(&body)
        }
    }

    fn upload(&self, file: UploadFile) -> impl Future<Output = Result<Value, BackendError>> + Send {
        let this = self.clone();
        async move {
            let url = this.endpoint(UPLOAD_PATH);
            debug!(%url, file = %file.file_name, bytes = file.bytes.len(), "uploading file");
            let part = Part::bytes(file.bytes).file_name(file.file_name);
            let form = Form::new().part("file", part);
            let body = this
                .send(UPLOAD_PATH, this.client.post(&url).multipart(form))
                .await?;
            Ok(serde_json::from_slice(&body)?)
        }
    }

    fn fetch_document(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<DocumentDetail, BackendError>> + Send {
        let this = self.clone();
        let name = name.to_string();
        async move {
            let url = this.document_url(&name, None)?;
            debug!(%url, "fetching document");
            let body = this.send(DOCUMENT_PATH, this.client.get(url)).await?;
            Ok(serde_json::from_slice(&body)?)
        }
    }

    fn transform_document(
        &self,
        name: &str,
        format: ExportFormat,
    ) -> impl Future<Output = Result<TransformedDocument, BackendError>> + Send {
        let this = self.clone();
        let name = name.to_string();
        async move {
            let url = this.document_url(&name, Some("transform"))?;
            debug!(%url, %format, "transforming document");
            let request = this
                .client
                .get(url)
                .query(&[("format", format.query_value())]);
            let body = this.send(TRANSFORM_ENDPOINT, request).await?;
            decode_transform(&body, format)
        }
    }
}

fn decode_transform(body: &[u8], format: ExportFormat) -> Result<TransformedDocument, BackendError> {
    let response: TransformResponse = serde_json::from_slice(body)?;
    Ok(TransformedDocument {
        filename: response.filename,
        format,
        text: response.transformed_data,
    })
}

fn decode_documents(body: &[u8]) -> Result<Vec<String>, BackendError> {
    let response: DocumentsResponse = serde_json::from_slice(body)?;
    Ok(response.documents)
}
