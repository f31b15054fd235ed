use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};

use crate::models::Conversation;

/// Fuzzy-filter conversations by title, keeping list order (most recent first).
/// A blank query keeps everything.
pub fn filter_conversations<'a>(
    conversations: &'a [Conversation],
    query: &str,
) -> Vec<&'a Conversation> {
    if query.trim().is_empty() {
        return conversations.iter().collect();
    }

    let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();

    conversations
        .iter()
        .filter(|c| pattern.score(Utf32Str::new(&c.title, &mut buf), &mut matcher).is_some())
        .collect()
}
