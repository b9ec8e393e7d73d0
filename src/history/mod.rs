use std::collections::VecDeque;

use crate::models::chat::{ Role, Turn };

/// Ordered transcript of one session. Turns are only ever appended; when a cap
/// is set, the oldest turns are dropped once it is exceeded.
#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: VecDeque<Turn>,
    max_turns: Option<usize>,
}

impl ConversationStore {
    pub fn new(max_turns: Option<usize>) -> Self {
        Self { turns: VecDeque::new(), max_turns }
    }

    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push_back(Turn::new(role, content));
        if let Some(max) = self.max_turns {
            while self.turns.len() > max {
                self.turns.pop_front();
            }
        }
    }

    pub fn history(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

pub fn format_history_for_log(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role(), t.content()))
        .collect::<Vec<_>>()
        .join("\n")
}
