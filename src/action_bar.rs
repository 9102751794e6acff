use egui::{vec2, Align, Layout, RichText, Ui};

use crate::state::EditorState;
use crate::theme::{AppTheme, WidthClass};
use crate::ui_controls;

pub struct ActionBarOutput {
    pub open_image: bool,
    pub load_project: bool,
    pub save_project: bool,
    pub export_png: bool,
}

pub fn zoom_percent_label(scale: f32) -> String {
    format!("{:.0}%", scale * 100.0)
}

pub fn show_action_bar(
    ui: &mut Ui,
    state: &mut EditorState,
    theme: &AppTheme,
    saved_feedback: bool,
    width_class: WidthClass,
) -> ActionBarOutput {
    let action_h = theme.controls.action_height;
    let button_gap = theme.layout.space_3 + 2.0;
    let file_w = if width_class == WidthClass::Compact {
        86.0
    } else {
        100.0
    };

    let mut out = ActionBarOutput {
        open_image: false,
        load_project: false,
        save_project: false,
        export_png: false,
    };

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing = vec2(button_gap, 0.0);

        if ui_controls::ghost_button(ui, theme, "Open Image", vec2(file_w + 14.0, action_h))
            .on_hover_text("Import a diagram (png, jpg, gif, svg)")
            .clicked()
        {
            out.open_image = true;
        }

        if ui_controls::ghost_button(ui, theme, "Load", vec2(file_w, action_h))
            .on_hover_text("Load a .proof project")
            .clicked()
        {
            out.load_project = true;
        }

        ui.add_space(theme.layout.space_2);
        ui_controls::vertical_divider(ui, theme, 16.0);
        ui.add_space(theme.layout.space_2);

        // Zoom group acts on display state directly.
        if ui_controls::ghost_button(ui, theme, "−", vec2(30.0, action_h)).clicked() {
            state.zoom_out();
        }
        ui.label(
            RichText::new(zoom_percent_label(state.scale))
                .color(theme.text.secondary)
                .size(13.0),
        );
        if ui_controls::ghost_button(ui, theme, "+", vec2(30.0, action_h)).clicked() {
            state.zoom_in();
        }
        if ui_controls::ghost_button(ui, theme, "Fit", vec2(40.0, action_h))
            .on_hover_text("Fit the image to the window")
            .clicked()
        {
            state.request_fit();
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(theme.layout.space_2);

            let dark_label = if state.dark_mode { "☀ Light" } else { "🌙 Dark" };
            if ui_controls::ghost_button(ui, theme, dark_label, vec2(76.0, action_h)).clicked() {
                state.dark_mode = !state.dark_mode;
            }

            ui.add_space(button_gap);

            let save_label = if saved_feedback { "Saved" } else { "Save" };
            if ui_controls::primary_button(ui, theme, save_label, vec2(file_w, action_h))
                .on_hover_text("Save the project (.proof)")
                .clicked()
            {
                out.save_project = true;
            }

            if saved_feedback && width_class != WidthClass::Compact {
                ui.add_space(button_gap);
                ui_controls::subtle_badge(ui, theme, "project saved");
            }

            ui.add_space(button_gap);

            let export = ui.add_enabled_ui(state.image.is_some(), |ui| {
                ui_controls::ghost_button(ui, theme, "Export PNG", vec2(file_w + 14.0, action_h))
            });
            if export
                .inner
                .on_hover_text("Flatten annotations into a PNG copy")
                .clicked()
            {
                out.export_png = true;
            }
        });
    });

    out
}
