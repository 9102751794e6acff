use egui::{vec2, Align, ComboBox, Layout, RichText, Ui};

use crate::annotation::{Color, FontSize};
use crate::palette;
use crate::state::EditorState;
use crate::theme::{AppTheme, WidthClass};
use crate::ui_controls;

pub const COLOR_PALETTE: [Color; 6] = [
    Color::rgb(0x00, 0x00, 0xFF),
    Color::rgb(0xE5, 0x3E, 0x3E),
    Color::rgb(0x38, 0xA1, 0x69),
    Color::rgb(0xDD, 0x6B, 0x20),
    Color::rgb(0x80, 0x5A, 0xD5),
    Color::rgb(0x1A, 0x20, 0x2C),
];

#[derive(Clone, Copy, Debug)]
pub struct ToolbarPlan {
    pub visible_group_count: usize,
    pub visible_color_count: usize,
    pub show_font_size_inline: bool,
    pub show_overflow: bool,
}

pub fn plan_toolbar_items(width_class: WidthClass) -> ToolbarPlan {
    let visible_group_count = match width_class {
        WidthClass::Compact => 1,
        WidthClass::Regular => 2,
        WidthClass::Wide => palette::GROUPS.len(),
    };
    let visible_color_count = match width_class {
        WidthClass::Compact => 3,
        WidthClass::Regular => 4,
        WidthClass::Wide => COLOR_PALETTE.len(),
    };
    let show_font_size_inline = width_class != WidthClass::Compact;

    let show_overflow = visible_group_count < palette::GROUPS.len()
        || visible_color_count < COLOR_PALETTE.len()
        || !show_font_size_inline;

    ToolbarPlan {
        visible_group_count,
        visible_color_count,
        show_font_size_inline,
        show_overflow,
    }
}

pub fn show_toolbar(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme, width_class: WidthClass) {
    let plan = plan_toolbar_items(width_class);

    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
        ui.spacing_mut().interact_size.y = theme.layout.chip_h;
        ui.spacing_mut().button_padding.y = theme.layout.space_1;
        ui.spacing_mut().item_spacing = vec2(theme.layout.control_gap, 0.0);

        for (index, group) in palette::GROUPS.iter().take(plan.visible_group_count).enumerate() {
            if index > 0 {
                group_separator(ui, theme);
            }
            render_token_group(ui, state, theme, group);
        }

        if plan.visible_color_count > 0 {
            group_separator(ui, theme);
            render_color_group(ui, state, theme, plan.visible_color_count);
            custom_color_control(ui, state);
        }

        if plan.show_font_size_inline {
            group_separator(ui, theme);
            font_size_control(ui, state, theme, "toolbar_font_size_inline");
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if plan.show_overflow {
                ui.menu_button("…", |ui| {
                    ui.spacing_mut().item_spacing =
                        vec2(theme.layout.control_gap, theme.layout.space_2);

                    for group in palette::GROUPS.iter().skip(plan.visible_group_count) {
                        ui.label(RichText::new(group.name).color(theme.text.muted).size(12.0));
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing =
                                vec2(theme.layout.control_gap, theme.layout.space_1);
                            render_token_group(ui, state, theme, group);
                        });
                    }

                    if plan.visible_color_count < COLOR_PALETTE.len() {
                        ui.separator();
                        ui.label(RichText::new("Colors").color(theme.text.muted).size(12.0));
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing =
                                vec2(theme.layout.control_gap, theme.layout.space_1);
                            for color in COLOR_PALETTE.iter().skip(plan.visible_color_count) {
                                if color_chip(ui, state, theme, *color) {
                                    ui.close_menu();
                                }
                            }
                        });
                    }

                    if !plan.show_font_size_inline {
                        ui.separator();
                        ui.label(
                            RichText::new("Text size")
                                .color(theme.text.muted)
                                .size(12.0),
                        );
                        ui.horizontal(|ui| {
                            font_size_control(ui, state, theme, "toolbar_font_size_overflow");
                        });
                    }
                });
            }
        });
    });
}

fn render_token_group(
    ui: &mut Ui,
    state: &mut EditorState,
    theme: &AppTheme,
    group: &palette::TemplateGroup,
) {
    for token in group.tokens {
        let armed = state.pending_token.as_deref() == Some(*token);
        if ui_controls::token_chip(ui, theme, token, armed)
            .on_hover_text("Click the canvas to place this")
            .clicked()
        {
            state.arm_token(token);
        }
    }
}

fn render_color_group(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme, count: usize) {
    for color in COLOR_PALETTE.iter().take(count) {
        color_chip(ui, state, theme, *color);
    }
}

fn color_chip(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme, color: Color) -> bool {
    let selected = state.active_color == color;
    let clicked = ui_controls::color_chip(ui, theme, color.to_color32(), selected)
        .on_hover_text("Color for new annotations")
        .clicked();
    if clicked {
        state.set_color(color);
    }
    clicked
}

fn custom_color_control(ui: &mut Ui, state: &mut EditorState) {
    let mut rgb = state.active_color.0;
    if ui
        .color_edit_button_srgb(&mut rgb)
        .on_hover_text("Custom color")
        .changed()
    {
        state.set_color(Color(rgb));
    }
}

fn font_size_control(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme, id_suffix: &'static str) {
    let mut points = state.font_size.as_u8();
    let control_h = theme.layout.chip_h;

    ui.allocate_ui_with_layout(
        vec2(112.0, control_h),
        Layout::left_to_right(Align::Center),
        |ui| {
            ui.spacing_mut().item_spacing.x = theme.layout.space_2;
            ui.scope(|ui| {
                ui.spacing_mut().interact_size.y = control_h;
                ui.spacing_mut().button_padding.y = theme.layout.space_1;

                ComboBox::from_id_source(("proofmark_toolbar_font_size", id_suffix))
                    .selected_text(points.to_string())
                    .width(74.0)
                    .show_ui(ui, |ui| {
                        for size in FontSize::MIN..=FontSize::MAX {
                            ui.selectable_value(&mut points, size, size.to_string());
                        }
                    });
            });

            ui.label(RichText::new("pt").color(theme.text.muted).size(12.0));
        },
    );

    if points != state.font_size.as_u8() {
        state.set_font_size(FontSize::from_points(points));
    }
}

fn group_separator(ui: &mut Ui, theme: &AppTheme) {
    ui.separator();
    let extra = (theme.layout.group_gap - theme.layout.control_gap).max(0.0);
    if extra > 0.0 {
        ui.add_space(extra);
    }
}
