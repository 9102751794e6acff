//! Fixed catalog of quick-insert tokens. The catalog itself is static; the
//! armed pending token lives in [`crate::state::EditorState`].

pub struct TemplateGroup {
    pub name: &'static str,
    pub tokens: &'static [&'static str],
}

pub const GROUPS: &[TemplateGroup] = &[
    TemplateGroup {
        name: "Labels",
        tokens: &["A", "B", "C", "D", "E", "F", "P", "Q"],
    },
    TemplateGroup {
        name: "Angles",
        tokens: &["∠A", "∠B", "∠C", "∠1", "∠2", "∠3"],
    },
    TemplateGroup {
        name: "Symbols",
        tokens: &["△", "⊥", "∥", "≅", "∼", "°", "θ", "α", "β"],
    },
];
