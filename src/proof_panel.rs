use egui::{vec2, RichText, ScrollArea, Ui};

use crate::state::EditorState;
use crate::theme::AppTheme;
use crate::ui_controls;

pub fn show_proof_panel(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme) {
    ui.label(
        RichText::new("Proof")
            .color(theme.text.primary)
            .size(16.0)
            .strong(),
    );
    ui.add_space(theme.layout.space_2);

    let mut remove_id = None;

    ScrollArea::vertical()
        .id_source("proofmark_proof_scroll")
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for (index, step) in state.proof_steps.iter_mut().enumerate() {
                ui_controls::card_frame(theme).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(format!("{}.", index + 1))
                                .color(theme.text.muted)
                                .size(13.0),
                        );
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui
                                    .small_button("✕")
                                    .on_hover_text("Remove step")
                                    .clicked()
                                {
                                    remove_id = Some(step.id);
                                }
                            },
                        );
                    });
                    ui.add(
                        egui::TextEdit::multiline(&mut step.justification)
                            .hint_text("Because…")
                            .desired_rows(1)
                            .desired_width(f32::INFINITY),
                    );
                    ui.add(
                        egui::TextEdit::multiline(&mut step.conclusion)
                            .hint_text("Therefore…")
                            .desired_rows(1)
                            .desired_width(f32::INFINITY),
                    );
                });
                ui.add_space(theme.layout.space_2);
            }
        });

    if let Some(id) = remove_id {
        state.remove_step(id);
    }

    ui.add_space(theme.layout.space_2);
    if ui_controls::ghost_button(
        ui,
        theme,
        "+ Add step",
        vec2(ui.available_width(), theme.controls.action_height),
    )
    .clicked()
    {
        state.add_step();
    }
}
