//! Keyword gate for relational branches

/// Cheap relevance pre-check: a question passes when it contains any of the
/// trigger substrings (case-insensitive). A gate with no keywords is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordGate {
    keywords: Vec<String>,
}

impl KeywordGate {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// A gate that lets every question through
    pub fn open() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether the question should reach the branch
    pub fn allows(&self, question: &str) -> bool {
        if self.is_open() {
            return true;
        }
        let lowered = question.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_gate() {
        let gate = KeywordGate::open();
        assert!(gate.allows("anything at all"));
        assert!(gate.allows(""));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let gate = KeywordGate::new(["event_amount", "Event_Expenses"]);
        assert!(gate.allows("total event_amount this year"));
        assert!(gate.allows("Show EVENT_EXPENSES by month"));
        assert!(!gate.allows("how many customers signed up"));
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let gate = KeywordGate::new(["", "  "]);
        assert!(gate.is_open());
    }
}
