//! Context assembly.
//!
//! Turns ranked matches into the grounding block embedded in the prompt.

use crate::types::ScoredMatch;

/// Maximum number of entries embedded in a context block.
pub const MAX_CONTEXT_ENTRIES: usize = 3;

/// Grounding text for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// No knowledge base entry qualified.
    Empty,
    /// Question/answer blocks of the best matches, most relevant first.
    Grounded { text: String, entries: usize },
}

impl Context {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The block text, `None` for [`Context::Empty`].
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Grounded { text, .. } => Some(text),
        }
    }

    /// Number of entries in the block.
    pub fn entries(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Grounded { entries, .. } => *entries,
        }
    }
}

/// Assemble `matches` into a [`Context`].
///
/// Each match becomes a two-line `Question:`/`Answer:` block; blocks are
/// separated by a blank line and keep the order of `matches`. Identical
/// questions are not merged. At most [`MAX_CONTEXT_ENTRIES`] matches are used.
pub fn assemble(matches: &[ScoredMatch<'_>]) -> Context {
    if matches.is_empty() {
        return Context::Empty;
    }

    let blocks: Vec<String> = matches
        .iter()
        .take(MAX_CONTEXT_ENTRIES)
        .map(|m| format!("Question: {}\nAnswer: {}", m.entry.question, m.entry.answer))
        .collect();

    Context::Grounded {
        entries: blocks.len(),
        text: blocks.join("\n\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnowledgeEntry;

    #[test]
    fn test_empty_matches_give_empty_context() {
        let context = assemble(&[]);
        assert!(context.is_empty());
        assert_eq!(context.text(), None);
        assert_eq!(context.entries(), 0);
    }

    #[test]
    fn test_blocks_keep_order() {
        let first = KnowledgeEntry::new("What is your return policy?", "30 days.", ["return"]);
        let second = KnowledgeEntry::new("How do refunds work?", "Back to your card.", ["refund"]);
        let matches = [
            ScoredMatch::new(7, &first, 2.0),
            ScoredMatch::new(2, &second, 1.0),
        ];

        let context = assemble(&matches);
        assert_eq!(
            context.text(),
            Some(
                "Question: What is your return policy?\nAnswer: 30 days.\n\n\
                 Question: How do refunds work?\nAnswer: Back to your card."
            )
        );
        assert_eq!(context.entries(), 2);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let entry = KnowledgeEntry::new("Same?", "Yes.", Vec::<String>::new());
        let twin = entry.clone();
        let matches = [ScoredMatch::new(0, &entry, 1.0), ScoredMatch::new(1, &twin, 1.0)];

        let context = assemble(&matches);
        assert_eq!(context.text().unwrap().matches("Question: Same?").count(), 2);
    }

    #[test]
    fn test_never_more_than_three_entries() {
        let entries: Vec<KnowledgeEntry> = (0..5)
            .map(|i| KnowledgeEntry::new(format!("Q{}", i), format!("A{}", i), ["k"]))
            .collect();
        let matches: Vec<ScoredMatch<'_>> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| ScoredMatch::new(i, e, 1.0))
            .collect();

        let context = assemble(&matches);
        assert_eq!(context.entries(), 3);
        assert!(!context.text().unwrap().contains("Q3"));
    }
}
