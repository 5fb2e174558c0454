//! Suggestions returned to the caller.

use serde::{Deserialize, Serialize};

use crate::practices::{BestPractice, extract_applied_practices};
use crate::prompt::{CLARIFICATION_MARKER, IMPROVED_CONTENT_MARKER, SUGGESTIONS_MARKER};

/// Text returned when retrieval found nothing to work with.
pub const NO_CONTEXT_TEXT: &str = "No relevant documents found to analyze.";

/// Where a suggestion's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionOrigin {
    Generated,
    Revised,
    Accepted,
    Edited,
    NoContext,
}

/// The three blocks the analysis prompt asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionSections {
    pub improved_content: String,
    pub suggestions: String,
    pub clarifications: String,
}

impl SuggestionSections {
    /// Split `text` on the section markers.
    ///
    /// Returns `None` unless the improved-content marker is present. Missing
    /// blocks come back empty; marker order in the text does not matter.
    pub fn parse(text: &str) -> Option<Self> {
        let markers = [IMPROVED_CONTENT_MARKER, SUGGESTIONS_MARKER, CLARIFICATION_MARKER];
        let mut found: Vec<(usize, usize)> = markers
            .iter()
            .enumerate()
            .filter_map(|(slot, marker)| text.find(marker).map(|pos| (pos, slot)))
            .collect();
        found.sort_unstable();
        // Markers share their dashes; one that starts inside an earlier
        // marker is not a heading.
        let mut covered = 0;
        found.retain(|&(pos, slot)| {
            let keep = pos >= covered;
            if keep {
                covered = pos + markers[slot].len();
            }
            keep
        });
        if !found.iter().any(|&(_, slot)| slot == 0) {
            return None;
        }

        let mut blocks = [String::new(), String::new(), String::new()];
        for (i, &(pos, slot)) in found.iter().enumerate() {
            let start = pos + markers[slot].len();
            let end = found.get(i + 1).map_or(text.len(), |&(next, _)| next);
            blocks[slot] = text[start..end].trim().to_string();
        }

        let [improved_content, suggestions, clarifications] = blocks;
        Some(Self { improved_content, suggestions, clarifications })
    }
}

/// Proposed RFP content plus its best-practice annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    pub applied_practices: Vec<BestPractice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<SuggestionSections>,
    pub origin: SuggestionOrigin,
}

impl Suggestion {
    /// Wrap `text` unchanged and annotate it.
    pub fn new(text: impl Into<String>, origin: SuggestionOrigin) -> Self {
        let text = text.into();
        Self {
            applied_practices: extract_applied_practices(&text),
            sections: SuggestionSections::parse(&text),
            text,
            origin,
        }
    }

    /// The placeholder used when retrieval came back empty.
    pub fn no_context() -> Self {
        Self {
            text: NO_CONTEXT_TEXT.to_string(),
            applied_practices: Vec::new(),
            sections: None,
            origin: SuggestionOrigin::NoContext,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATTED: &str = "---IMPROVED CONTENT---\nThe vendor shall deliver a clear plan.\n\n\
        ---SUGGESTIONS---\n- Added deliverables\n\n---AREAS FOR CLARIFICATION---\n- Budget cap?";

    #[test]
    fn parses_all_three_sections() {
        let sections = SuggestionSections::parse(FORMATTED).unwrap();
        assert_eq!(sections.improved_content, "The vendor shall deliver a clear plan.");
        assert_eq!(sections.suggestions, "- Added deliverables");
        assert_eq!(sections.clarifications, "- Budget cap?");
    }

    #[test]
    fn overlapping_markers_do_not_split_headings() {
        let sections =
            SuggestionSections::parse("---IMPROVED CONTENT---SUGGESTIONS---\nbody").unwrap();
        assert_eq!(sections.improved_content, "SUGGESTIONS---\nbody");
        assert!(sections.suggestions.is_empty());

        let adjacent = SuggestionSections::parse(
            "---IMPROVED CONTENT------SUGGESTIONS------AREAS FOR CLARIFICATION---",
        )
        .unwrap();
        assert_eq!(adjacent, SuggestionSections::default());

        assert!(SuggestionSections::parse("---SUGGESTIONS---IMPROVED CONTENT---").is_none());
    }

    #[test]
    fn unformatted_text_has_no_sections() {
        assert!(SuggestionSections::parse("Just prose.").is_none());
        assert!(SuggestionSections::parse("---SUGGESTIONS---\nonly this").is_none());
    }

    #[test]
    fn missing_blocks_are_empty() {
        let sections =
            SuggestionSections::parse("intro\n---IMPROVED CONTENT---\nBetter text").unwrap();
        assert_eq!(sections.improved_content, "Better text");
        assert!(sections.suggestions.is_empty());
        assert!(sections.clarifications.is_empty());
    }

    #[test]
    fn new_keeps_text_verbatim() {
        let suggestion = Suggestion::new(FORMATTED, SuggestionOrigin::Generated);
        assert_eq!(suggestion.text, FORMATTED);
        assert!(suggestion.applied_practices.contains(&BestPractice::Clarity));
        assert!(suggestion.sections.is_some());
    }

    #[test]
    fn no_context_placeholder() {
        let suggestion = Suggestion::no_context();
        assert_eq!(suggestion.text, NO_CONTEXT_TEXT);
        assert_eq!(suggestion.origin, SuggestionOrigin::NoContext);
        assert!(suggestion.applied_practices.is_empty());
    }

    #[test]
    fn origin_serializes_snake_case() {
        let json = serde_json::to_value(Suggestion::no_context()).unwrap();
        assert_eq!(json["origin"], "no_context");
        assert!(json.get("sections").is_none());
    }
}
