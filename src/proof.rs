use serde::{Deserialize, Serialize};

/// One row of the proof write-up. Both texts are free-form and may be empty;
/// nothing here checks logical validity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProofStep {
    pub id: u64,
    #[serde(rename = "because")]
    pub justification: String,
    #[serde(rename = "therefore")]
    pub conclusion: String,
}

impl ProofStep {
    pub fn blank(id: u64) -> Self {
        Self {
            id,
            justification: String::new(),
            conclusion: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProofStep;

    #[test]
    fn proof_step_uses_wire_field_names() {
        let step = ProofStep {
            id: 2,
            justification: "vertical angles".to_string(),
            conclusion: "∠1 ≅ ∠2".to_string(),
        };

        let value = serde_json::to_value(&step).expect("serialize step");
        assert_eq!(value["id"], 2);
        assert_eq!(value["because"], "vertical angles");
        assert_eq!(value["therefore"], "∠1 ≅ ∠2");
    }
}
