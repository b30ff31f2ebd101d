use crate::backend::{DocumentDetail, ExportFormat, SelectedFile, TransformedDocument};
use crate::utils::file_size::format_size;
use crate::utils::pretty_json::to_pretty_string;
use serde_json::Value;
use std::path::Path;

/// Everything the view renders from. Each field is written only by its own
/// handler on the UI thread.
#[derive(Debug, Default)]
pub struct ViewState {
    pub selected_file: Option<SelectedFile>,
    pub documents: Vec<String>,
    pub processed: Option<Value>,
    /// Document picked from the list, whose detail is shown below it.
    pub open_document: Option<String>,
    pub document_detail: Option<DocumentDetail>,
    pub export_format: ExportFormat,
    pub export: Option<TransformedDocument>,
    /// Network requests spawned but not yet applied.
    pub in_flight: usize,
}

/// What one frame shows, derived from [`ViewState`].
#[derive(Debug, Default, PartialEq)]
pub struct PageModel {
    pub selected_label: Option<String>,
    pub documents: Vec<DocumentRow>,
    pub processed_text: Option<String>,
    pub processed_file_name: String,
    pub detail: Option<DetailModel>,
    pub busy: bool,
}

#[derive(Debug, PartialEq)]
pub struct DocumentRow {
    pub name: String,
    pub open: bool,
}

#[derive(Debug, PartialEq)]
pub struct DetailModel {
    pub name: String,
    /// `None` while the detail request is outstanding or after it failed.
    pub data_text: Option<String>,
    pub export: Option<TransformedDocument>,
}

impl ViewState {
    pub fn select(&mut self, file: SelectedFile) {
        self.selected_file = Some(file);
    }

    /// Ignored when the selection has moved on since the lookup started.
    pub fn set_file_size(&mut self, path: &Path, size: Option<u64>) {
        if let Some(file) = self.selected_file.as_mut().filter(|f| f.path.as_path() == path) {
            file.size = size;
        }
    }

    pub fn replace_documents(&mut self, documents: Vec<String>) {
        self.documents = documents;
    }

    pub fn replace_processed(&mut self, processed: Value) {
        self.processed = Some(processed);
    }

    /// Returns false when `name` is already open.
    pub fn open(&mut self, name: &str) -> bool {
        if self.open_document.as_deref() == Some(name) {
            return false;
        }
        self.open_document = Some(name.to_string());
        self.document_detail = None;
        self.export = None;
        true
    }

    pub fn replace_detail(&mut self, detail: DocumentDetail) -> bool {
        if self.open_document.as_deref() != Some(detail.filename.as_str()) {
            return false;
        }
        self.document_detail = Some(detail);
        true
    }

    pub fn replace_export(&mut self, export: TransformedDocument) -> bool {
        if self.open_document.as_deref() != Some(export.filename.as_str()) {
            return false;
        }
        self.export = Some(export);
        true
    }

    /// Two-space indented JSON of the last upload result.
    pub fn processed_pretty(&self) -> Option<String> {
        self.processed.as_ref().map(to_pretty_string)
    }

    pub fn processed_file_name(&self) -> String {
        match &self.selected_file {
            Some(file) => format!("{}_processed.json", file.name),
            None => "processed.json".to_string(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn page(&self) -> PageModel {
        let selected_label = self.selected_file.as_ref().map(|file| match file.size {
            Some(size) => format!("{} ({})", file.name, format_size(size)),
            None => file.name.clone(),
        });

        let documents = self
            .documents
            .iter()
            .map(|name| DocumentRow {
                name: name.clone(),
                open: self.open_document.as_deref() == Some(name.as_str()),
            })
            .collect();

        let detail = self.open_document.as_ref().map(|name| DetailModel {
            name: name.clone(),
            data_text: self
                .document_detail
                .as_ref()
                .map(|detail| to_pretty_string(&detail.structured_data)),
            export: self.export.clone(),
        });

        PageModel {
            selected_label,
            documents,
            processed_text: self.processed_pretty(),
            processed_file_name: self.processed_file_name(),
            detail,
            busy: self.is_busy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail(name: &str) -> DocumentDetail {
        DocumentDetail {
            filename: name.to_string(),
            structured_data: json!({"keywords": ["rust"], "score": 3.0}),
        }
    }

    #[test]
    fn empty_state_renders_only_the_form() {
        let page = ViewState::default().page();

        assert_eq!(page.selected_label, None);
        assert!(page.documents.is_empty());
        assert_eq!(page.processed_text, None);
        assert_eq!(page.detail, None);
        assert!(!page.busy);
    }

    #[test]
    fn page_contains_pretty_printed_result() {
        let mut state = ViewState::default();
        state.replace_processed(json!({"result": "ok"}));

        assert_eq!(
            state.page().processed_text.as_deref(),
            Some("{\n  \"result\": \"ok\"\n}")
        );
    }

    #[test]
    fn whole_float_in_result_prints_without_fraction() {
        let mut state = ViewState::default();
        state.replace_processed(serde_json::from_str(r#"{"average_sentence_length": 12.0}"#).unwrap());

        assert_eq!(
            state.page().processed_text.as_deref(),
            Some("{\n  \"average_sentence_length\": 12\n}")
        );
    }

    #[test]
    fn key_order_is_preserved() {
        let mut state = ViewState::default();
        let value: Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": {"b": 2, "a": 3}}"#).unwrap();
        state.replace_processed(value);

        let pretty = state.processed_pretty().unwrap();
        assert!(pretty.find("zeta").unwrap() < pretty.find("alpha").unwrap());
        assert!(pretty.find("\"b\"").unwrap() < pretty.find("\"a\"").unwrap());
    }

    #[test]
    fn documents_render_in_order_with_open_marker() {
        let mut state = ViewState::default();
        state.replace_documents(vec!["b.pdf".into(), "a.pdf".into()]);
        state.open("a.pdf");

        let page = state.page();
        assert_eq!(
            page.documents,
            vec![
                DocumentRow { name: "b.pdf".into(), open: false },
                DocumentRow { name: "a.pdf".into(), open: true },
            ]
        );
    }

    #[test]
    fn new_selection_replaces_old() {
        let mut state = ViewState::default();
        state.select(SelectedFile::from_path("/tmp/first.pdf"));
        state.select(SelectedFile::from_path("/tmp/second.pdf"));

        assert_eq!(state.page().selected_label.as_deref(), Some("second.pdf"));
        assert_eq!(state.processed_file_name(), "second.pdf_processed.json");
    }

    #[test]
    fn stale_size_lookup_is_ignored() {
        let mut state = ViewState::default();
        state.select(SelectedFile::from_path("/tmp/first.pdf"));
        state.select(SelectedFile::from_path("/tmp/second.pdf"));

        state.set_file_size(Path::new("/tmp/first.pdf"), Some(10));
        assert_eq!(state.page().selected_label.as_deref(), Some("second.pdf"));

        state.set_file_size(Path::new("/tmp/second.pdf"), Some(1536));
        assert_eq!(state.page().selected_label.as_deref(), Some("second.pdf (1.5 KB)"));
    }

    #[test]
    fn detail_for_another_document_is_dropped() {
        let mut state = ViewState::default();
        state.open("a.pdf");
        state.open("b.pdf");

        assert!(!state.replace_detail(detail("a.pdf")));
        assert!(state.replace_detail(detail("b.pdf")));

        let shown = state.page().detail.unwrap();
        assert_eq!(shown.name, "b.pdf");
        assert_eq!(
            shown.data_text.as_deref(),
            Some("{\n  \"keywords\": [\n    \"rust\"\n  ],\n  \"score\": 3\n}")
        );
    }

    #[test]
    fn opening_another_document_clears_export() {
        let mut state = ViewState::default();
        state.open("a.pdf");
        state.replace_export(TransformedDocument {
            filename: "a.pdf".into(),
            format: ExportFormat::Json,
            text: "{}".into(),
        });

        assert!(!state.open("a.pdf"));
        assert!(state.export.is_some());

        assert!(state.open("b.pdf"));
        assert!(state.export.is_none());
        assert!(state.document_detail.is_none());
    }
}
