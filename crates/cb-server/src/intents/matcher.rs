//! First-match substring scan over the intent table.

use super::IntentTable;

impl IntentTable {
    /// Tag of the first intent whose pattern occurs in `question`, ignoring case.
    ///
    /// Records are tried in table order and patterns in list order, so when a
    /// question contains patterns of several intents the earlier intent wins.
    pub fn match_tag(&self, question: &str) -> Option<&str> {
        let question = question.to_lowercase();

        self.records
            .iter()
            .zip(&self.lowered)
            .find(|(_, patterns)| patterns.iter().any(|p| question.contains(p.as_str())))
            .map(|(record, _)| record.tag.as_str())
    }
}
