use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, FontSize};
use crate::proof::ProofStep;

pub const FILE_EXTENSIONS: &[&str] = &["proof", "json"];

/// The complete persisted representation of one annotation session. The
/// `imagePath` stays an opaque reference: resolving it back into pixels is
/// the caller's job, this module never touches image bytes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectDocument {
    #[serde(rename = "imagePath", skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    pub annotations: Vec<Annotation>,
    #[serde(rename = "proofSteps")]
    pub proof_steps: Vec<ProofStep>,
    #[serde(rename = "fontSize")]
    pub font_size: FontSize,
    #[serde(rename = "isDarkMode")]
    pub is_dark_mode: bool,
}

impl Default for ProjectDocument {
    fn default() -> Self {
        Self {
            image_path: None,
            annotations: Vec::new(),
            proof_steps: Vec::new(),
            font_size: FontSize::DEFAULT,
            is_dark_mode: false,
        }
    }
}

pub fn serialize(document: &ProjectDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("cannot encode project document")
}

/// Parses a project document. Fails as a whole on malformed input; a
/// successfully parsed document has every missing optional field defaulted.
pub fn deserialize(text: &str) -> Result<ProjectDocument> {
    let document: ProjectDocument =
        serde_json::from_str(text).context("malformed project document")?;

    let mut seen = std::collections::HashSet::new();
    for annotation in &document.annotations {
        if !seen.insert(annotation.id) {
            bail!("duplicate annotation id {}", annotation.id);
        }
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::{deserialize, serialize, ProjectDocument};
    use crate::annotation::{Annotation, Color, FontSize, Point};
    use crate::proof::ProofStep;

    fn sample_document() -> ProjectDocument {
        ProjectDocument {
            image_path: Some("diagrams/triangle.png".to_string()),
            annotations: vec![
                Annotation {
                    id: 1,
                    pos: Point::new(120.0, 80.0),
                    text: "∠A".to_string(),
                    color: Color::rgb(0, 0, 255),
                    font_size: FontSize::from_points(28),
                },
                Annotation {
                    id: 2,
                    pos: Point::new(300.5, 41.25),
                    text: "B".to_string(),
                    color: Color::rgb(229, 62, 62),
                    font_size: FontSize::from_points(36),
                },
            ],
            proof_steps: vec![
                ProofStep {
                    id: 1,
                    justification: "given".to_string(),
                    conclusion: "AB ≅ CD".to_string(),
                },
                ProofStep::blank(2),
            ],
            font_size: FontSize::from_points(32),
            is_dark_mode: true,
        }
    }

    #[test]
    fn round_trip_preserves_document() {
        let document = sample_document();
        let text = serialize(&document).expect("serialize");
        let restored = deserialize(&text).expect("deserialize");
        assert_eq!(restored, document);
    }

    #[test]
    fn round_trip_preserves_empty_document() {
        let document = ProjectDocument::default();
        let text = serialize(&document).expect("serialize");
        let restored = deserialize(&text).expect("deserialize");
        assert_eq!(restored, document);
        assert!(!text.contains("imagePath"));
    }

    #[test]
    fn document_survives_a_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("triangle.proof");
        let document = sample_document();

        std::fs::write(&path, serialize(&document).expect("serialize")).expect("write");
        let text = std::fs::read_to_string(&path).expect("read");

        assert_eq!(deserialize(&text).expect("deserialize"), document);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let document = deserialize("{}").expect("empty object is a valid document");
        assert_eq!(document.image_path, None);
        assert!(document.annotations.is_empty());
        assert!(document.proof_steps.is_empty());
        assert_eq!(document.font_size.as_u8(), 28);
        assert!(!document.is_dark_mode);
    }

    #[test]
    fn minimal_document_loads_light_mode() {
        let text = r#"{"annotations":[],"proofSteps":[],"fontSize":28,"isDarkMode":false}"#;
        let document = deserialize(text).expect("minimal document");
        assert_eq!(document.image_path, None);
        assert!(document.annotations.is_empty());
        assert!(document.proof_steps.is_empty());
        assert_eq!(document.font_size.as_u8(), 28);
        assert!(!document.is_dark_mode);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!(deserialize("not json").is_err());
        assert!(deserialize(r#"{"annotations": 7}"#).is_err());
        assert!(deserialize(r#"{"annotations":[{"id":1}]}"#).is_err());
    }

    #[test]
    fn duplicate_annotation_ids_are_rejected() {
        let text = r##"{
            "annotations": [
                {"id": 1, "x": 0.0, "y": 0.0, "text": "A", "color": "#000000", "fontSize": 28},
                {"id": 1, "x": 5.0, "y": 5.0, "text": "B", "color": "#000000", "fontSize": 28}
            ]
        }"##;
        assert!(deserialize(text).is_err());
    }

    #[test]
    fn wire_keys_match_format_contract() {
        let text = serialize(&sample_document()).expect("serialize");
        for key in [
            "imagePath",
            "annotations",
            "proofSteps",
            "fontSize",
            "isDarkMode",
            "because",
            "therefore",
        ] {
            assert!(text.contains(key), "missing key {key}");
        }
    }
}
