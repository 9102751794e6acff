use std::path::Path;

use anyhow::{Context as _, Result};
use chrono::Local;
use eframe::egui::{self, Context as EguiContext, Key, TopBottomPanel};
use eframe::{App, Frame};
use image::DynamicImage;

use crate::action_bar;
use crate::canvas;
use crate::export;
use crate::project;
use crate::proof_panel;
use crate::state::EditorState;
use crate::theme;
use crate::toolbar;
use crate::ui_controls;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg"];

pub struct ProofMarkApp {
    pub state: EditorState,
    saved_feedback_until: Option<f64>,
}

impl ProofMarkApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let state = EditorState::default();
        theme::apply_theme(&cc.egui_ctx, &theme::theme_for(state.dark_mode));

        Self {
            state,
            saved_feedback_until: None,
        }
    }

    fn decode_image(path: &Path) -> Result<DynamicImage> {
        image::open(path).with_context(|| format!("cannot decode image {}", path.display()))
    }

    /// Import boundary. Picker cancellation is a silent abort, every other
    /// failure leaves the previous canvas state intact.
    fn import_image(&mut self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Open diagram image")
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return Ok(());
        };

        let image = Self::decode_image(&path)?;
        self.state.reset_for_new_image(image, path);
        Ok(())
    }

    fn save_project(&mut self, now: f64) -> Result<()> {
        let default_name = format!("Proof {}", Local::now().format("%Y-%m-%d at %H.%M.%S"));
        let Some(mut path) = rfd::FileDialog::new()
            .set_title("Save proof project")
            .set_file_name(format!("{default_name}.proof"))
            .add_filter("Proof project", project::FILE_EXTENSIONS)
            .save_file()
        else {
            return Ok(());
        };

        if path.extension().is_none() {
            path.set_extension("proof");
        }

        let text = project::serialize(&self.state.to_document())?;
        std::fs::write(&path, text)
            .with_context(|| format!("cannot write project to {}", path.display()))?;

        tracing::info!(path = %path.display(), "saved project");
        self.saved_feedback_until = Some(now + 1.5);
        Ok(())
    }

    /// Load boundary. A malformed document applies nothing; resolving the
    /// image reference is a second, independent step whose failure leaves
    /// the loaded document in place without a background image.
    fn load_project(&mut self) -> Result<()> {
        let Some(path) = rfd::FileDialog::new()
            .set_title("Load proof project")
            .add_filter("Proof project", project::FILE_EXTENSIONS)
            .pick_file()
        else {
            return Ok(());
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read project {}", path.display()))?;
        let document = project::deserialize(&text)?;

        self.state.apply_document(document);
        tracing::info!(path = %path.display(), "loaded project");

        if let Some(image_path) = self.state.image_path.clone() {
            match Self::decode_image(&image_path) {
                Ok(image) => self.state.attach_image(image),
                Err(err) => show_error("Image missing", &err),
            }
        }

        Ok(())
    }

    fn export_png(&mut self) -> Result<()> {
        let Some(image) = self.state.image.as_ref() else {
            return Ok(());
        };

        let stem = self
            .state
            .image_path
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|stem| stem.to_str())
            .unwrap_or("Diagram");
        let Some(mut path) = rfd::FileDialog::new()
            .set_title("Export annotated PNG")
            .set_file_name(format!("{stem} (annotated).png"))
            .add_filter("PNG", &["png"])
            .save_file()
        else {
            return Ok(());
        };

        if path.extension().is_none() {
            path.set_extension("png");
        }

        let font = export::load_system_font()?;
        let flattened = export::flatten(
            &image.dynamic,
            &self.state.annotations,
            self.state.scale,
            &font,
        )
        .context("flatten failed")?;
        let png = export::encode_png(&flattened)?;
        std::fs::write(&path, png)
            .with_context(|| format!("cannot write PNG to {}", path.display()))?;

        tracing::info!(path = %path.display(), "exported annotated PNG");
        Ok(())
    }

    fn handle_shortcuts(&mut self, ctx: &EguiContext, now: f64) {
        let cmd = ctx.input(|input| input.modifiers.command || input.modifiers.ctrl);

        if ctx.input(|input| input.key_pressed(Key::Escape)) {
            if self.state.text_edit.is_some() {
                self.state.text_edit = None;
            } else if self.state.pending_token.is_some() {
                self.state.pending_token = None;
            } else {
                self.state.select(None);
            }
        }

        if !cmd {
            let editing_text = ctx.wants_keyboard_input() || self.state.text_edit.is_some();
            if !editing_text
                && ctx.input(|input| {
                    input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace)
                })
            {
                self.state.delete_selected();
            }
            return;
        }

        if ctx.input(|input| input.key_pressed(Key::O)) {
            if let Err(err) = self.import_image() {
                show_error("Import failed", &err);
            }
        }

        if ctx.input(|input| input.key_pressed(Key::S)) {
            if let Err(err) = self.save_project(now) {
                show_error("Save failed", &err);
            }
        }

        if ctx.input(|input| input.key_pressed(Key::L)) {
            if let Err(err) = self.load_project() {
                show_error("Load failed", &err);
            }
        }

        if ctx.input(|input| input.key_pressed(Key::E)) {
            if let Err(err) = self.export_png() {
                show_error("Export failed", &err);
            }
        }

        if ctx.input(|input| input.key_pressed(Key::Plus) || input.key_pressed(Key::Equals)) {
            self.state.zoom_in();
        }

        if ctx.input(|input| input.key_pressed(Key::Minus)) {
            self.state.zoom_out();
        }

        if ctx.input(|input| input.key_pressed(Key::Num0)) {
            self.state.request_fit();
        }
    }
}

fn show_error(title: &str, err: &anyhow::Error) {
    let message = format!("{err:#}");
    tracing::warn!(title, error = %message, "operation failed");
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(message.as_str())
        .show();
}

impl App for ProofMarkApp {
    fn update(&mut self, ctx: &EguiContext, _frame: &mut Frame) {
        let app_theme = theme::theme_for(self.state.dark_mode);
        theme::apply_theme(ctx, &app_theme);

        let now = ctx.input(|input| input.time);
        self.handle_shortcuts(ctx, now);

        TopBottomPanel::top("toolbar")
            .exact_height(app_theme.layout.toolbar_height)
            .frame(ui_controls::toolbar_frame(&app_theme))
            .show(ctx, |ui| {
                let width_class = app_theme.width_class(ui.available_width());
                toolbar::show_toolbar(ui, &mut self.state, &app_theme, width_class);
            });

        let saved_feedback = self
            .saved_feedback_until
            .is_some_and(|deadline| now <= deadline);

        let action_output = TopBottomPanel::bottom("action_bar")
            .exact_height(app_theme.layout.action_bar_height)
            .frame(ui_controls::action_bar_frame(&app_theme))
            .show(ctx, |ui| {
                let width_class = app_theme.width_class(ui.available_width());
                action_bar::show_action_bar(
                    ui,
                    &mut self.state,
                    &app_theme,
                    saved_feedback,
                    width_class,
                )
            })
            .inner;

        egui::SidePanel::right("proof_panel")
            .exact_width(app_theme.layout.proof_panel_width)
            .resizable(false)
            .frame(ui_controls::side_panel_frame(&app_theme))
            .show(ctx, |ui| {
                proof_panel::show_proof_panel(ui, &mut self.state, &app_theme);
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(app_theme.surfaces.app_bg)
                    .inner_margin(egui::Margin::symmetric(
                        app_theme.layout.panel_padding_x,
                        app_theme.layout.panel_padding_y + 2.0,
                    )),
            )
            .show(ctx, |ui| {
                canvas::show_canvas(ui, ctx, &mut self.state, &app_theme);
            });

        if action_output.open_image {
            if let Err(err) = self.import_image() {
                show_error("Import failed", &err);
            }
        }
        if action_output.load_project {
            if let Err(err) = self.load_project() {
                show_error("Load failed", &err);
            }
        }
        if action_output.save_project {
            if let Err(err) = self.save_project(now) {
                show_error("Save failed", &err);
            }
        }
        if action_output.export_png {
            if let Err(err) = self.export_png() {
                show_error("Export failed", &err);
            }
        }
    }
}
