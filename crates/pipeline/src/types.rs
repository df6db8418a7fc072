//! Pipeline output contract and supporting types.

use serde::{Deserialize, Serialize};

/// Reserved literal the primary generator emits when it cannot answer from
/// the provided excerpts. Detection is a case-sensitive substring match on
/// the raw reply; a genuine answer containing this token would incorrectly
/// route to the fallback branch. Known brittleness, preserved deliberately.
pub const NO_ANSWER_SENTINEL: &str = "no_answer";

/// The orchestrator's output, returned to the calling collaborator for
/// persistence as an assistant-role message. Built whole or not at all: a
/// failed or cancelled run never yields a partial result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Answer text with embedded newlines stripped
    pub text: String,

    /// Titles of the excerpts retrieved for this turn. Every retrieved
    /// excerpt is an eligible citation; empty on the fallback branch.
    pub citations: Vec<String>,

    /// Whether the fallback branch produced the answer
    #[serde(rename = "usedFallback")]
    pub used_fallback: bool,

    /// Top retrieval similarity score, stored as auxiliary metadata next to
    /// the message. Absent on the fallback branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Pipeline stages, used for span labeling and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Embedding,
    Retrieving,
    PrimaryGenerating,
    Deciding,
    FallbackGenerating,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Embedding => "embedding",
            Stage::Retrieving => "retrieving",
            Stage::PrimaryGenerating => "primary_generating",
            Stage::Deciding => "deciding",
            Stage::FallbackGenerating => "fallback_generating",
        };
        f.write_str(name)
    }
}

/// Remove embedded newline characters from a reply.
pub fn strip_newlines(text: &str) -> String {
    text.replace('\n', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_newlines() {
        assert_eq!(strip_newlines("line one\nline two\n"), "line oneline two");
        assert_eq!(strip_newlines("no newlines"), "no newlines");
    }

    #[test]
    fn test_result_serialization_uses_camel_case() {
        let result = PipelineResult {
            text: "Hi".to_string(),
            citations: vec!["Doc A".to_string()],
            used_fallback: false,
            confidence: Some(0.8),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["usedFallback"], false);
        assert_eq!(json["citations"][0], "Doc A");
    }

    #[test]
    fn test_result_serialization_omits_absent_confidence() {
        let result = PipelineResult {
            text: "Sorry".to_string(),
            citations: vec![],
            used_fallback: true,
            confidence: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::Embedding.to_string(), "embedding");
        assert_eq!(Stage::FallbackGenerating.to_string(), "fallback_generating");
    }
}
