mod state;
mod ui;

use crate::backend::{
    Backend, BackendError, BackendEvent, ExportFormat, SelectedFile, UploadFile,
};
use eframe::egui::{self, Color32};
use eframe::App;
use serde_json::Value;
use state::ViewState;
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

pub struct DocumentsApp<B: Backend> {
    backend: B,
    runtime: Runtime,
    state: ViewState,
    events_tx: Sender<BackendEvent>,
    events_rx: Receiver<BackendEvent>,
    ctx: egui::Context,
    accent: Color32,
}

impl<B: Backend> DocumentsApp<B> {
    /// Builds the controller and fires the initial document fetch. `ctx` is
    /// woken whenever a spawned task completes.
    pub fn new(ctx: egui::Context, backend: B, runtime: Runtime, accent: Color32) -> Self {
        info!("Initializing TransformoDocs client");
        let (events_tx, events_rx) = mpsc::channel();
        let mut app = Self {
            backend,
            runtime,
            state: ViewState::default(),
            events_tx,
            events_rx,
            ctx,
            accent,
        };
        app.load_documents();
        app
    }

    pub fn load_documents(&mut self) {
        debug!("Requesting document list");
        let backend = self.backend.clone();
        self.spawn_request(async move {
            BackendEvent::DocumentsLoaded(backend.fetch_documents().await)
        });
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        let file = SelectedFile::from_path(path);
        info!(file = %file.path.display(), "File selected");
        let path = file.path.clone();
        self.state.select(file);

        self.spawn_local(async move {
            let size = tokio::fs::metadata(&path).await.ok().map(|meta| meta.len());
            BackendEvent::FileSized { path, size }
        });
    }

    pub fn submit(&mut self) {
        let Some(file) = self.state.selected_file.clone() else {
            debug!("Submit ignored, no file selected");
            return;
        };

        info!(file = %file.path.display(), "Uploading file");
        let backend = self.backend.clone();
        self.spawn_request(async move {
            let result = match tokio::fs::read(&file.path).await {
                Ok(bytes) => {
                    backend
                        .upload(UploadFile {
                            file_name: file.name,
                            bytes,
                        })
                        .await
                }
                Err(source) => Err(BackendError::ReadFile {
                    path: file.path,
                    source,
                }),
            };
            BackendEvent::UploadFinished(result)
        });
    }

    /// Shows `name` from the document list and fetches its structured data.
    pub fn open_document(&mut self, name: &str) {
        if !self.state.open(name) {
            return;
        }

        info!(document = name, "Opening document");
        let backend = self.backend.clone();
        let name = name.to_string();
        self.spawn_request(async move {
            BackendEvent::DocumentLoaded(backend.fetch_document(&name).await)
        });
    }

    pub fn set_export_format(&mut self, format: ExportFormat) {
        self.state.export_format = format;
    }

    /// Requests the open document in the chosen export format.
    pub fn export_document(&mut self) {
        let Some(name) = self.state.open_document.clone() else {
            debug!("Export ignored, no document open");
            return;
        };

        let format = self.state.export_format;
        info!(document = %name, %format, "Exporting document");
        let backend = self.backend.clone();
        self.spawn_request(async move {
            BackendEvent::DocumentTransformed(backend.transform_document(&name, format).await)
        });
    }

    pub fn save_processed(&mut self, path: impl Into<PathBuf>) {
        if let Some(text) = self.state.processed_pretty() {
            self.save_text(path.into(), text);
        }
    }

    pub fn save_export(&mut self, path: impl Into<PathBuf>) {
        if let Some(export) = &self.state.export {
            let text = export.text.clone();
            self.save_text(path.into(), text);
        }
    }

    fn save_text(&mut self, path: PathBuf, text: String) {
        info!(path = %path.display(), "Saving");
        self.spawn_local(async move {
            let result = match tokio::fs::write(&path, text).await {
                Ok(()) => Ok(path),
                Err(source) => Err(BackendError::WriteFile { path, source }),
            };
            BackendEvent::Saved(result)
        });
    }

    fn spawn_request<F>(&mut self, task: F)
    where
        F: Future<Output = BackendEvent> + Send + 'static,
    {
        self.state.in_flight += 1;
        self.spawn_local(task);
    }

    fn spawn_local<F>(&mut self, task: F)
    where
        F: Future<Output = BackendEvent> + Send + 'static,
    {
        let events = self.events_tx.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if events.send(event).is_err() {
                debug!("Event dropped, window already closed");
                return;
            }
            ctx.request_repaint();
        });
    }

    /// Applies every event that has resolved so far, in resolution order.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: BackendEvent) {
        if event.is_request() {
            self.state.in_flight = self.state.in_flight.saturating_sub(1);
        }

        match event {
            BackendEvent::DocumentsLoaded(Ok(documents)) => {
                info!(count = documents.len(), "Document list refreshed");
                self.state.replace_documents(documents);
            }
            BackendEvent::DocumentsLoaded(Err(e)) => {
                error!("Error fetching documents: {}", e);
            }
            BackendEvent::UploadFinished(Ok(processed)) => {
                info!("Upload processed");
                self.apply_processed(processed);
            }
            BackendEvent::UploadFinished(Err(e)) => {
                error!("Error uploading file: {}", e);
            }
            BackendEvent::DocumentLoaded(Ok(detail)) => {
                let name = detail.filename.clone();
                if !self.state.replace_detail(detail) {
                    debug!(document = %name, "Dropping detail for a closed document");
                }
            }
            BackendEvent::DocumentLoaded(Err(e)) => {
                error!("Error fetching document: {}", e);
            }
            BackendEvent::DocumentTransformed(Ok(export)) => {
                let name = export.filename.clone();
                if !self.state.replace_export(export) {
                    debug!(document = %name, "Dropping export for a closed document");
                }
            }
            BackendEvent::DocumentTransformed(Err(e)) => {
                error!("Error transforming document: {}", e);
            }
            BackendEvent::FileSized { path, size } => {
                self.state.set_file_size(&path, size);
            }
            BackendEvent::Saved(Ok(path)) => {
                info!(path = %path.display(), "Saved");
            }
            BackendEvent::Saved(Err(e)) => {
                error!("Error saving file: {}", e);
            }
        }
    }

    fn apply_processed(&mut self, processed: Value) {
        self.state.replace_processed(processed);
        self.load_documents();
    }
}

impl<B: Backend> App for DocumentsApp<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.render(ctx);
    }
}
