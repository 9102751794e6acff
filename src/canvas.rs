use egui::{
    vec2, Align2, Color32, Context, CursorIcon, FontId, Id, Key, Pos2, Rect, Response, ScrollArea,
    Sense, Stroke, Ui,
};

use crate::annotation::Point;
use crate::state::{DragState, EditorState, TextEditState};
use crate::theme::AppTheme;
use crate::transform;

const CANVAS_PADDING: f32 = 24.0;
const PICK_TOLERANCE: f32 = 4.0;

pub fn show_canvas(ui: &mut Ui, ctx: &Context, state: &mut EditorState, theme: &AppTheme) {
    if state.image.is_none() {
        empty_canvas(ui, theme);
        return;
    }

    let (texture_id, image_size) = {
        let image = state.image.as_mut().expect("image must exist");
        image.ensure_texture(ctx);
        (
            image.texture.as_ref().expect("texture is missing").id(),
            image.size_vec2(),
        )
    };

    let available = ui.available_size();
    if state.fit_to_view {
        // Sticky until an explicit zoom: the fit scale re-derives on every
        // viewport resize, stored annotation positions never do.
        let viewport = (available - vec2(CANVAS_PADDING * 2.0, CANVAS_PADDING * 2.0))
            .max(vec2(1.0, 1.0));
        state.scale = transform::fit_scale(image_size, viewport);
    }

    let scaled = image_size * state.scale;
    let canvas_size = vec2(
        (scaled.x + CANVAS_PADDING * 2.0).max(available.x),
        (scaled.y + CANVAS_PADDING * 2.0).max(available.y),
    );

    ScrollArea::both()
        .id_source("proofmark_canvas_scroll")
        .show(ui, |ui| {
            let (canvas_rect, response) =
                ui.allocate_exact_size(canvas_size, Sense::click_and_drag());

            // Annotations are pinned to this origin: zoom rescales the image
            // around it but never rewrites stored positions.
            let origin = canvas_rect.min + vec2(CANVAS_PADDING, CANVAS_PADDING);
            let image_rect = Rect::from_min_size(origin, scaled);

            let painter = ui.painter_at(canvas_rect);
            painter.rect_filled(canvas_rect, 16.0, theme.surfaces.canvas_bg);
            let image_card = image_rect.expand(10.0);
            painter.rect_filled(image_card, 14.0, theme.surfaces.card_bg);
            painter.rect_stroke(
                image_card,
                14.0,
                Stroke::new(1.0, theme.surfaces.stroke_soft),
            );

            painter.image(
                texture_id,
                image_rect,
                Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );

            draw_annotations(&painter, state, origin);
            draw_selection(&painter, state, origin, theme);
            draw_pending_preview(ctx, &painter, state, canvas_rect);

            handle_pointer_interaction(ctx, state, &response, origin);
            draw_text_editor(ui, state, theme);
        });
}

fn empty_canvas(ui: &mut Ui, theme: &AppTheme) {
    let (rect, _) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 16.0, theme.surfaces.canvas_bg);
    painter.rect_stroke(rect, 16.0, Stroke::new(1.0, theme.surfaces.stroke_soft));
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "Open a diagram image to start annotating",
        FontId::proportional(19.0),
        theme.text.secondary,
    );
}

fn draw_annotations(painter: &egui::Painter, state: &EditorState, origin: Pos2) {
    for annotation in &state.annotations {
        painter.text(
            canvas_to_screen(annotation.pos, origin),
            Align2::LEFT_TOP,
            &annotation.text,
            FontId::proportional(annotation.font_size.points()),
            annotation.color32(),
        );
    }
}

fn draw_selection(painter: &egui::Painter, state: &EditorState, origin: Pos2, theme: &AppTheme) {
    let Some(selected_id) = state.selection else {
        return;
    };
    let Some(annotation) = state.find_annotation(selected_id) else {
        return;
    };

    let bounds = annotation.bounds();
    let selection_rect = Rect::from_min_max(
        canvas_to_screen(Point::from_pos2(bounds.min), origin),
        canvas_to_screen(Point::from_pos2(bounds.max), origin),
    )
    .expand(3.0);

    painter.rect_stroke(
        selection_rect,
        6.0,
        Stroke::new(1.8, theme.surfaces.accent),
    );
}

fn draw_pending_preview(
    ctx: &Context,
    painter: &egui::Painter,
    state: &EditorState,
    canvas_rect: Rect,
) {
    let Some(token) = state.pending_token.as_deref() else {
        return;
    };
    let Some(pointer) = ctx.input(|input| input.pointer.hover_pos()) else {
        return;
    };
    if !canvas_rect.contains(pointer) {
        return;
    }

    painter.text(
        pointer,
        Align2::LEFT_TOP,
        token,
        FontId::proportional(state.font_size.points()),
        state.active_color.to_color32().linear_multiply(0.6),
    );
}

fn handle_pointer_interaction(
    ctx: &Context,
    state: &mut EditorState,
    response: &Response,
    origin: Pos2,
) {
    if state.pending_token.is_some() && response.hovered() {
        ctx.set_cursor_icon(CursorIcon::Crosshair);
    }

    let Some(pointer_pos) = ctx.input(|input| input.pointer.interact_pos()) else {
        return;
    };
    let canvas_pos = screen_to_canvas(pointer_pos, origin);

    if response.double_clicked() {
        handle_double_click(state, canvas_pos, pointer_pos);
        return;
    }

    if response.drag_started() {
        begin_drag(state, canvas_pos);
    }

    if response.dragged() {
        update_drag(state, canvas_pos);
    }

    if response.drag_stopped() {
        finish_drag(state, canvas_pos);
    }

    if response.clicked() && !response.dragged() {
        handle_click(state, canvas_pos);
    }
}

fn begin_drag(state: &mut EditorState, canvas_pos: Point) {
    // A pending token means the press is an insertion, not a move.
    if state.pending_token.is_some() {
        return;
    }

    if let Some(hit_id) = pick_annotation(state, canvas_pos) {
        state.select(Some(hit_id));
        if let Some(original) = state.find_annotation(hit_id).cloned() {
            state.drag_state = Some(DragState {
                annotation_id: hit_id,
                start: canvas_pos,
                original,
            });
        }
    } else {
        state.select(None);
    }
}

fn update_drag(state: &mut EditorState, canvas_pos: Point) {
    let Some(drag) = state.drag_state.clone() else {
        return;
    };
    let delta = drag.start.delta(canvas_pos);
    if let Some(annotation) = state.find_annotation_mut(drag.annotation_id) {
        annotation.pos = drag.original.pos.offset(delta);
    }
}

fn finish_drag(state: &mut EditorState, canvas_pos: Point) {
    let Some(drag) = state.drag_state.take() else {
        return;
    };
    let delta = drag.start.delta(canvas_pos);
    state.move_annotation(drag.annotation_id, drag.original.pos.offset(delta));
}

fn handle_click(state: &mut EditorState, canvas_pos: Point) {
    if state.pending_token.is_some() {
        state.insert_pending(canvas_pos);
        return;
    }
    let hit = pick_annotation(state, canvas_pos);
    state.select(hit);
}

fn handle_double_click(state: &mut EditorState, canvas_pos: Point, screen_pos: Pos2) {
    let Some(id) = pick_annotation(state, canvas_pos) else {
        return;
    };
    let Some(annotation) = state.find_annotation(id) else {
        return;
    };
    let text = annotation.text.clone();

    state.selection = Some(id);
    state.text_edit = Some(TextEditState {
        annotation_id: id,
        buffer: text,
        screen_pos,
    });
}

fn draw_text_editor(ui: &mut Ui, state: &mut EditorState, theme: &AppTheme) {
    let Some(edit) = state.text_edit.clone() else {
        return;
    };

    let mut buffer = edit.buffer.clone();
    let mut commit = false;
    let mut cancel = false;
    let popup_id = Id::new("proofmark_text_edit");

    egui::Area::new(popup_id)
        .order(egui::Order::Foreground)
        .fixed_pos(edit.screen_pos + vec2(8.0, 12.0))
        .show(ui.ctx(), |ui| {
            egui::Frame::none()
                .fill(theme.surfaces.card_bg)
                .rounding(egui::Rounding::same(theme.controls.card_rounding))
                .stroke(Stroke::new(1.0, theme.surfaces.stroke_strong))
                .inner_margin(egui::Margin::symmetric(12.0, 10.0))
                .show(ui, |ui| {
                    ui.set_min_width(220.0);
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut buffer)
                            .hint_text("Annotation text")
                            .desired_width(200.0),
                    );
                    response.request_focus();

                    if ui.input(|input| input.key_pressed(Key::Enter)) {
                        commit = true;
                    } else if response.lost_focus()
                        && ui.input(|input| input.pointer.any_released())
                    {
                        commit = true;
                    }
                    if ui.input(|input| input.key_pressed(Key::Escape)) {
                        cancel = true;
                    }
                });
        });

    if cancel {
        state.text_edit = None;
        return;
    }

    if commit {
        state.update_text(edit.annotation_id, buffer.trim());
        state.text_edit = None;
        return;
    }

    state.text_edit = Some(TextEditState {
        annotation_id: edit.annotation_id,
        buffer,
        screen_pos: edit.screen_pos,
    });
}

fn pick_annotation(state: &EditorState, canvas_pos: Point) -> Option<u64> {
    state
        .annotations
        .iter()
        .rev()
        .find(|annotation| annotation.contains(canvas_pos, PICK_TOLERANCE))
        .map(|annotation| annotation.id)
}

fn canvas_to_screen(pos: Point, origin: Pos2) -> Pos2 {
    Pos2::new(origin.x + pos.x, origin.y + pos.y)
}

fn screen_to_canvas(pos: Pos2, origin: Pos2) -> Point {
    Point::new(pos.x - origin.x, pos.y - origin.y)
}
