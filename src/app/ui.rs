use super::state::{DetailModel, PageModel};
use super::DocumentsApp;
use crate::backend::{Backend, ExportFormat};
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;

impl<B: Backend> DocumentsApp<B> {
    pub fn render(&mut self, ctx: &egui::Context) {
        let page = self.state.page();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("TransformoDocs Application");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Upload a document to have it processed")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });

                ui.add_space(20.0);
                self.render_form(ui, &page);

                ui.add_space(20.0);
                self.render_documents(ui, &page);

                if let Some(detail) = &page.detail {
                    ui.add_space(20.0);
                    self.render_detail(ui, detail);
                }

                if let Some(text) = &page.processed_text {
                    ui.add_space(20.0);
                    ui.horizontal(|ui| {
                        ui.heading("Processed Data");
                        if ui.button("💾 Save result…").clicked() {
                            if let Some(path) = FileDialog::new()
                                .set_file_name(page.processed_file_name.as_str())
                                .save_file()
                            {
                                self.save_processed(path);
                            }
                        }
                    });
                    ui.add_space(5.0);
                    code_block(ui, text);
                }

                ui.add_space(20.0);
            });
        });
    }

    fn render_form(&mut self, ui: &mut egui::Ui, page: &PageModel) {
        ui.group(|ui| {
            ui.horizontal(|ui| {
                if ui.button("📂 Choose File").clicked() {
                    if let Some(path) = FileDialog::new().pick_file() {
                        self.select_file(path);
                    }
                }
                match &page.selected_label {
                    Some(label) => {
                        ui.label(label.as_str());
                    }
                    None => {
                        ui.label(
                            RichText::new("No file chosen")
                                .color(ui.visuals().text_color().gamma_multiply(0.6)),
                        );
                    }
                }
            });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let button = egui::Button::new(
                    RichText::new("📤 Upload and Process").color(Color32::WHITE),
                )
                .fill(self.accent)
                .min_size(egui::vec2(200.0, 36.0));
                if ui.add(button).clicked() {
                    self.submit();
                }
                if page.busy {
                    ui.spinner();
                }
            });
        });
    }

    fn render_documents(&mut self, ui: &mut egui::Ui, page: &PageModel) {
        ui.heading("Processed Documents");
        ui.add_space(5.0);
        for row in &page.documents {
            ui.horizontal(|ui| {
                ui.colored_label(self.accent, "•");
                if ui.selectable_label(row.open, row.name.as_str()).clicked() {
                    self.open_document(&row.name);
                }
            });
        }
    }

    fn render_detail(&mut self, ui: &mut egui::Ui, detail: &DetailModel) {
        ui.heading(format!("Document: {}", detail.name));
        ui.add_space(5.0);
        match &detail.data_text {
            Some(text) => code_block(ui, text),
            None => {
                ui.label(
                    RichText::new("No data loaded")
                        .color(ui.visuals().text_color().gamma_multiply(0.6)),
                );
            }
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let mut format = self.state.export_format;
            egui::ComboBox::from_label("Export format")
                .selected_text(format.to_string())
                .show_ui(ui, |ui| {
                    for option in ExportFormat::ALL {
                        ui.selectable_value(&mut format, option, option.to_string());
                    }
                });
            if format != self.state.export_format {
                self.set_export_format(format);
            }
            if ui.button("🔄 Transform").clicked() {
                self.export_document();
            }
        });

        if let Some(export) = &detail.export {
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{} export", export.format)).strong());
                if ui.button("💾 Save export…").clicked() {
                    if let Some(path) = FileDialog::new()
                        .set_file_name(export.default_file_name().as_str())
                        .save_file()
                    {
                        self.save_export(path);
                    }
                }
            });
            code_block(ui, &export.text);
        }
    }
}

fn code_block(ui: &mut egui::Ui, text: &str) {
    egui::Frame::none()
        .fill(ui.visuals().extreme_bg_color)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(text).monospace());
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, DocumentDetail, TransformedDocument, UploadFile};
    use serde_json::{json, Value};
    use std::future::Future;

    #[derive(Clone)]
    struct StaticBackend;

    impl Backend for StaticBackend {
        fn fetch_documents(
            &self,
        ) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send {
            async { Ok(vec!["a.pdf".to_string()]) }
        }

        fn upload(&self, _file: UploadFile) -> impl Future<Output = Result<Value, BackendError>> + Send {
            async { Ok(json!({"result": "ok"})) }
        }

        fn fetch_document(
            &self,
            name: &str,
        ) -> impl Future<Output = Result<DocumentDetail, BackendError>> + Send {
            let filename = name.to_string();
            async move {
                Ok(DocumentDetail {
                    filename,
                    structured_data: json!({}),
                })
            }
        }

        fn transform_document(
            &self,
            name: &str,
            format: ExportFormat,
        ) -> impl Future<Output = Result<TransformedDocument, BackendError>> + Send {
            let filename = name.to_string();
            async move {
                Ok(TransformedDocument {
                    filename,
                    format,
                    text: String::new(),
                })
            }
        }
    }

    fn app() -> (egui::Context, DocumentsApp<StaticBackend>) {
        // A current-thread runtime never polls spawned tasks here, so state
        // only changes through the test.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let ctx = egui::Context::default();
        let app = DocumentsApp::new(ctx.clone(), StaticBackend, runtime, Color32::LIGHT_BLUE);
        (ctx, app)
    }

    #[test]
    fn empty_page_still_paints_the_form() {
        let (ctx, mut app) = app();

        let output = ctx.run(Default::default(), |ctx| app.render(ctx));

        assert!(!output.shapes.is_empty());
        assert_eq!(app.state.page().processed_text, None);
    }

    #[test]
    fn populated_page_paints_more_than_empty_page() {
        let (ctx, mut app) = app();
        let empty = ctx.run(Default::default(), |ctx| app.render(ctx)).shapes.len();

        app.state.replace_documents(vec!["a.pdf".into(), "b.pdf".into()]);
        app.state.replace_processed(json!({"result": "ok", "pages": [1, 2]}));
        app.state.open("a.pdf");
        app.state.replace_detail(DocumentDetail {
            filename: "a.pdf".into(),
            structured_data: json!({"keywords": ["rust"]}),
        });
        app.state.replace_export(TransformedDocument {
            filename: "a.pdf".into(),
            format: ExportFormat::Xml,
            text: "<document/>".into(),
        });
        app.state.select(crate::backend::SelectedFile::from_path("/tmp/example.pdf"));
        let full = ctx.run(Default::default(), |ctx| app.render(ctx)).shapes.len();

        assert!(full > empty);
        let page = app.state.page();
        assert!(page
            .processed_text
            .unwrap()
            .contains("\"result\": \"ok\""));
        assert_eq!(page.detail.unwrap().export.unwrap().text, "<document/>");
    }
}
