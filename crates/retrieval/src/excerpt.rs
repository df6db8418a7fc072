//! Retrieved excerpt type.

use serde::Serialize;

/// A retrieved chunk of source-document text plus metadata.
///
/// Produced by the retrieval index, never mutated by the pipeline; consumed
/// only for prompt rendering and citation extraction.
#[derive(Debug, Clone, Serialize)]
pub struct Excerpt {
    /// Excerpt text used as generation context
    pub content: String,

    /// Source document title, when the index carries one. Titles become the
    /// citations attached to an answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Identifier of the source document this excerpt was cut from
    pub source_id: String,

    /// Cosine similarity to the query embedding. Descending retrieval order;
    /// internal, used for the optional confidence field and logging.
    #[serde(skip_serializing)]
    pub score: f32,
}

/// Collect citation titles from retrieved excerpts, in retrieval order.
///
/// Every excerpt retrieved for a turn is an eligible citation (there is no
/// per-excerpt attribution step). Untitled excerpts contribute nothing;
/// duplicate titles from adjacent chunks of one document are collapsed.
pub fn citation_titles(excerpts: &[Excerpt]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    excerpts
        .iter()
        .filter_map(|e| e.title.as_ref())
        .filter(|title| seen.insert(title.as_str().to_string()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn excerpt(title: Option<&str>) -> Excerpt {
        Excerpt {
            content: "text".to_string(),
            title: title.map(str::to_string),
            source_id: "doc-1".to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_citation_titles_preserve_retrieval_order() {
        let excerpts = vec![excerpt(Some("Doc B")), excerpt(Some("Doc A"))];
        assert_eq!(citation_titles(&excerpts), vec!["Doc B", "Doc A"]);
    }

    #[test]
    fn test_citation_titles_skip_untitled() {
        let excerpts = vec![excerpt(None), excerpt(Some("Doc A")), excerpt(None)];
        assert_eq!(citation_titles(&excerpts), vec!["Doc A"]);
    }

    #[test]
    fn test_citation_titles_deduplicate() {
        let excerpts = vec![
            excerpt(Some("Doc A")),
            excerpt(Some("Doc A")),
            excerpt(Some("Doc B")),
        ];
        assert_eq!(citation_titles(&excerpts), vec!["Doc A", "Doc B"]);
    }

    #[test]
    fn test_citation_titles_empty_retrieval() {
        assert!(citation_titles(&[]).is_empty());
    }
}
