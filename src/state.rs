use std::path::PathBuf;

use egui::{ColorImage, Context as EguiContext, Pos2, TextureHandle, TextureOptions, Vec2};
use image::DynamicImage;

use crate::annotation::{Annotation, AnnotationId, Color, FontSize, Point};
use crate::project::ProjectDocument;
use crate::proof::ProofStep;
use crate::transform;

pub struct DiagramImage {
    pub dynamic: DynamicImage,
    pub texture: Option<TextureHandle>,
}

impl DiagramImage {
    pub fn new(dynamic: DynamicImage) -> Self {
        Self {
            dynamic,
            texture: None,
        }
    }

    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.dynamic.width() as f32, self.dynamic.height() as f32)
    }

    pub fn ensure_texture(&mut self, ctx: &EguiContext) {
        if self.texture.is_some() {
            return;
        }
        let rgba = self.dynamic.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let texture = ctx.load_texture("diagram", color, TextureOptions::LINEAR);
        self.texture = Some(texture);
    }
}

#[derive(Clone, Debug)]
pub struct DragState {
    pub annotation_id: AnnotationId,
    pub start: Point,
    pub original: Annotation,
}

#[derive(Clone, Debug)]
pub struct TextEditState {
    pub annotation_id: AnnotationId,
    pub buffer: String,
    pub screen_pos: Pos2,
}

/// The whole application state, owned by the UI thread. Every mutation runs
/// synchronously inside one frame; there is no shared-state locking.
pub struct EditorState {
    pub image: Option<DiagramImage>,
    pub image_path: Option<PathBuf>,
    pub annotations: Vec<Annotation>,
    pub selection: Option<AnnotationId>,
    pub pending_token: Option<String>,
    pub active_color: Color,
    pub font_size: FontSize,
    pub dark_mode: bool,
    pub scale: f32,
    pub fit_to_view: bool,
    pub proof_steps: Vec<ProofStep>,
    pub drag_state: Option<DragState>,
    pub text_edit: Option<TextEditState>,
    next_id: AnnotationId,
    next_step_id: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        let mut state = Self {
            image: None,
            image_path: None,
            annotations: Vec::new(),
            selection: None,
            pending_token: None,
            active_color: Color::rgb(0x00, 0x00, 0xFF),
            font_size: FontSize::DEFAULT,
            dark_mode: false,
            scale: 1.0,
            fit_to_view: false,
            proof_steps: Vec::new(),
            drag_state: None,
            text_edit: None,
            next_id: 1,
            next_step_id: 1,
        };
        state.seed_blank_step_if_empty();
        state
    }
}

impl EditorState {
    fn next_annotation_id(&mut self) -> AnnotationId {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Inserts a new annotation and selects it. Empty text is rejected as a
    /// no-op so a stray click can never create an invisible annotation.
    pub fn insert(
        &mut self,
        pos: Point,
        text: &str,
        color: Color,
        font_size: FontSize,
    ) -> Option<AnnotationId> {
        if text.is_empty() {
            return None;
        }
        let id = self.next_annotation_id();
        self.annotations.push(Annotation {
            id,
            pos,
            text: text.to_string(),
            color,
            font_size,
        });
        self.selection = Some(id);
        Some(id)
    }

    /// Consumes the pending token, if any, and inserts it at `pos`. The
    /// token is cleared either way so one click places at most one glyph.
    pub fn insert_pending(&mut self, pos: Point) -> Option<AnnotationId> {
        let token = self.pending_token.take()?;
        self.insert(pos, &token, self.active_color, self.font_size)
    }

    /// Arming the already-armed token disarms it; any other token replaces it.
    pub fn arm_token(&mut self, token: &str) {
        if self.pending_token.as_deref() == Some(token) {
            self.pending_token = None;
        } else {
            self.pending_token = Some(token.to_string());
        }
    }

    pub fn select(&mut self, id: Option<AnnotationId>) {
        self.selection = id;
    }

    /// Silent no-op when the id is gone: a drag-end callback may race a
    /// deletion of its target.
    pub fn move_annotation(&mut self, id: AnnotationId, pos: Point) {
        match self.find_annotation_mut(id) {
            Some(annotation) => annotation.pos = pos,
            None => tracing::debug!(id, "move target no longer exists"),
        }
    }

    /// Empty text is permitted here, unlike insert: it represents
    /// in-progress editing.
    pub fn update_text(&mut self, id: AnnotationId, text: &str) {
        if let Some(annotation) = self.find_annotation_mut(id) {
            annotation.text = text.to_string();
        }
    }

    pub fn delete(&mut self, id: AnnotationId) {
        self.annotations.retain(|annotation| annotation.id != id);
        if self.selection == Some(id) {
            self.selection = None;
        }
        if let Some(drag) = &self.drag_state {
            if drag.annotation_id == id {
                self.drag_state = None;
            }
        }
        if let Some(edit) = &self.text_edit {
            if edit.annotation_id == id {
                self.text_edit = None;
            }
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(selected) = self.selection {
            self.delete(selected);
        }
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.selection = None;
        self.drag_state = None;
        self.text_edit = None;
    }

    pub fn find_annotation_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations
            .iter_mut()
            .find(|annotation| annotation.id == id)
    }

    pub fn find_annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find(|annotation| annotation.id == id)
    }

    pub fn zoom_in(&mut self) {
        self.scale = transform::zoom_in(self.scale);
        self.fit_to_view = false;
    }

    pub fn zoom_out(&mut self) {
        self.scale = transform::zoom_out(self.scale);
        self.fit_to_view = false;
    }

    pub fn request_fit(&mut self) {
        self.fit_to_view = true;
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.font_size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.active_color = color;
    }

    /// Starts a fresh project around a newly imported image. Annotations and
    /// proof steps are discarded; the last-used font size and the display
    /// preference survive.
    pub fn reset_for_new_image(&mut self, image: DynamicImage, path: PathBuf) {
        tracing::info!(path = %path.display(), "imported diagram image");
        self.image = Some(DiagramImage::new(image));
        self.image_path = Some(path);
        self.clear();
        self.pending_token = None;
        self.proof_steps.clear();
        self.seed_blank_step_if_empty();
        self.scale = 1.0;
        self.fit_to_view = true;
    }

    /// Attaches a decoded image without touching the rest of the state. Used
    /// when a loaded document's image reference is resolved.
    pub fn attach_image(&mut self, image: DynamicImage) {
        self.image = Some(DiagramImage::new(image));
        self.fit_to_view = true;
    }

    pub fn add_step(&mut self) -> u64 {
        let id = self.next_step_id;
        self.next_step_id = self.next_step_id.saturating_add(1);
        self.proof_steps.push(ProofStep::blank(id));
        id
    }

    pub fn remove_step(&mut self, id: u64) {
        self.proof_steps.retain(|step| step.id != id);
    }

    /// A loaded or fresh project always shows at least one editable row.
    pub fn seed_blank_step_if_empty(&mut self) {
        if self.proof_steps.is_empty() {
            self.add_step();
        }
    }

    pub fn to_document(&self) -> ProjectDocument {
        ProjectDocument {
            image_path: self
                .image_path
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
            annotations: self.annotations.clone(),
            proof_steps: self.proof_steps.clone(),
            font_size: self.font_size,
            is_dark_mode: self.dark_mode,
        }
    }

    /// Replaces the whole state with a loaded document. The image reference
    /// stays unresolved; the caller feeds the decoded bitmap back through
    /// [`EditorState::attach_image`].
    pub fn apply_document(&mut self, document: ProjectDocument) {
        self.image = None;
        self.image_path = document.image_path.map(PathBuf::from);
        self.annotations = document.annotations;
        self.proof_steps = document.proof_steps;
        self.font_size = document.font_size;
        self.dark_mode = document.is_dark_mode;
        self.selection = None;
        self.pending_token = None;
        self.drag_state = None;
        self.text_edit = None;
        self.scale = 1.0;
        self.fit_to_view = true;

        // Identities must never be reused, so the counters continue past
        // everything the document brought in.
        self.next_id = self
            .annotations
            .iter()
            .map(|annotation| annotation.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        self.next_step_id = self
            .proof_steps
            .iter()
            .map(|step| step.id)
            .max()
            .unwrap_or(0)
            .saturating_add(1);

        self.seed_blank_step_if_empty();
    }
}

#[cfg(test)]
mod tests {
    use super::EditorState;
    use crate::annotation::{Color, FontSize, Point};
    use crate::project::ProjectDocument;

    fn blue() -> Color {
        Color::rgb(0, 0, 255)
    }

    #[test]
    fn insert_assigns_unique_ids_and_selects() {
        let mut state = EditorState::default();
        let mut ids = Vec::new();
        for i in 0..32 {
            let pos = Point::new(i as f32, i as f32);
            let id = state
                .insert(pos, "A", blue(), FontSize::DEFAULT)
                .expect("insert");
            assert_eq!(state.selection, Some(id));
            ids.push(id);
        }

        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn insert_rejects_empty_text() {
        let mut state = EditorState::default();
        assert_eq!(
            state.insert(Point::new(0.0, 0.0), "", blue(), FontSize::DEFAULT),
            None
        );
        assert!(state.annotations.is_empty());
        assert_eq!(state.selection, None);
    }

    #[test]
    fn pending_token_click_scenario() {
        let mut state = EditorState::default();
        state.set_color(blue());
        state.set_font_size(FontSize::from_points(28));
        state.arm_token("∠A");

        let id = state
            .insert_pending(Point::new(120.0, 80.0))
            .expect("pending insert");

        assert_eq!(state.annotations.len(), 1);
        let annotation = &state.annotations[0];
        assert_eq!(annotation.pos, Point::new(120.0, 80.0));
        assert_eq!(annotation.text, "∠A");
        assert_eq!(annotation.color.to_hex(), "#0000FF");
        assert_eq!(annotation.font_size.as_u8(), 28);
        assert_eq!(state.selection, Some(id));
        assert_eq!(state.pending_token, None);
    }

    #[test]
    fn insert_pending_without_token_is_noop() {
        let mut state = EditorState::default();
        assert_eq!(state.insert_pending(Point::new(10.0, 10.0)), None);
        assert!(state.annotations.is_empty());
    }

    #[test]
    fn arming_same_token_disarms() {
        let mut state = EditorState::default();
        state.arm_token("∠A");
        assert_eq!(state.pending_token.as_deref(), Some("∠A"));
        state.arm_token("∠A");
        assert_eq!(state.pending_token, None);
        state.arm_token("∠A");
        state.arm_token("⊥");
        assert_eq!(state.pending_token.as_deref(), Some("⊥"));
    }

    #[test]
    fn move_missing_id_leaves_list_unchanged() {
        let mut state = EditorState::default();
        state.insert(Point::new(1.0, 2.0), "A", blue(), FontSize::DEFAULT);
        state.insert(Point::new(3.0, 4.0), "B", blue(), FontSize::DEFAULT);
        let before = state.annotations.clone();

        state.move_annotation(9999, Point::new(50.0, 50.0));

        assert_eq!(state.annotations, before);
    }

    #[test]
    fn move_updates_position_in_place() {
        let mut state = EditorState::default();
        let id = state
            .insert(Point::new(1.0, 2.0), "A", blue(), FontSize::DEFAULT)
            .expect("insert");

        state.move_annotation(id, Point::new(42.0, 24.0));

        assert_eq!(state.annotations[0].pos, Point::new(42.0, 24.0));
    }

    #[test]
    fn delete_selected_clears_selection() {
        let mut state = EditorState::default();
        let id = state
            .insert(Point::new(0.0, 0.0), "A", blue(), FontSize::DEFAULT)
            .expect("insert");
        assert_eq!(state.selection, Some(id));

        state.delete(id);

        assert_eq!(state.selection, None);
        assert!(state.annotations.is_empty());
    }

    #[test]
    fn delete_other_keeps_selection() {
        let mut state = EditorState::default();
        let first = state
            .insert(Point::new(0.0, 0.0), "A", blue(), FontSize::DEFAULT)
            .expect("insert");
        let second = state
            .insert(Point::new(5.0, 5.0), "B", blue(), FontSize::DEFAULT)
            .expect("insert");

        state.delete(first);

        assert_eq!(state.selection, Some(second));
        assert_eq!(state.annotations.len(), 1);
    }

    #[test]
    fn update_text_allows_empty() {
        let mut state = EditorState::default();
        let id = state
            .insert(Point::new(0.0, 0.0), "A", blue(), FontSize::DEFAULT)
            .expect("insert");

        state.update_text(id, "");

        assert_eq!(state.annotations[0].text, "");
    }

    #[test]
    fn clear_empties_store_and_selection() {
        let mut state = EditorState::default();
        state.insert(Point::new(0.0, 0.0), "A", blue(), FontSize::DEFAULT);
        state.insert(Point::new(5.0, 5.0), "B", blue(), FontSize::DEFAULT);

        state.clear();

        assert!(state.annotations.is_empty());
        assert_eq!(state.selection, None);
    }

    #[test]
    fn default_state_seeds_one_blank_step() {
        let state = EditorState::default();
        assert_eq!(state.proof_steps.len(), 1);
        assert!(state.proof_steps[0].justification.is_empty());
        assert!(state.proof_steps[0].conclusion.is_empty());
    }

    #[test]
    fn remove_step_by_id() {
        let mut state = EditorState::default();
        let first = state.proof_steps[0].id;
        let second = state.add_step();

        state.remove_step(first);

        assert_eq!(state.proof_steps.len(), 1);
        assert_eq!(state.proof_steps[0].id, second);
    }

    #[test]
    fn apply_minimal_document_matches_load_scenario() {
        let mut state = EditorState::default();
        state.dark_mode = true;
        state.insert(Point::new(9.0, 9.0), "X", blue(), FontSize::DEFAULT);

        let text = r#"{"annotations":[],"proofSteps":[],"fontSize":28,"isDarkMode":false}"#;
        let document = crate::project::deserialize(text).expect("parse");
        state.apply_document(document);

        assert!(state.annotations.is_empty());
        assert_eq!(state.proof_steps.len(), 1);
        assert_eq!(state.font_size.as_u8(), 28);
        assert!(!state.dark_mode);
        assert!(state.image.is_none());
        assert_eq!(state.image_path, None);
    }

    #[test]
    fn ids_continue_past_loaded_document() {
        let mut state = EditorState::default();
        let document: ProjectDocument = crate::project::deserialize(
            r##"{
                "annotations": [
                    {"id": 7, "x": 0.0, "y": 0.0, "text": "A", "color": "#000000", "fontSize": 28}
                ],
                "proofSteps": [{"id": 4, "because": "", "therefore": ""}]
            }"##,
        )
        .expect("parse");

        state.apply_document(document);
        let id = state
            .insert(Point::new(1.0, 1.0), "B", blue(), FontSize::DEFAULT)
            .expect("insert");
        let step = state.add_step();

        assert!(id > 7);
        assert!(step > 4);
    }

    #[test]
    fn round_trip_through_document() {
        let mut state = EditorState::default();
        state.set_color(blue());
        state.arm_token("∠B");
        state.insert_pending(Point::new(42.0, 17.0));
        state.proof_steps[0].justification = "given".to_string();
        state.proof_steps[0].conclusion = "∠B ≅ ∠C".to_string();
        state.dark_mode = true;

        let document = state.to_document();
        let text = crate::project::serialize(&document).expect("serialize");
        let restored = crate::project::deserialize(&text).expect("deserialize");
        assert_eq!(restored, document);

        let mut other = EditorState::default();
        other.apply_document(restored);
        assert_eq!(other.annotations, state.annotations);
        assert_eq!(other.proof_steps, state.proof_steps);
        assert!(other.dark_mode);
    }
}
