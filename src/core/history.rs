use std::collections::VecDeque;
use std::sync::Mutex;

use super::types::{CompletionResult, GenerationParameters};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub prompt: String,
    pub parameters: GenerationParameters,
    pub result: CompletionResult,
}

/// Bounded log of successful completions, oldest dropped first.
#[derive(Debug)]
pub struct CompletionHistory {
    capacity: usize,
    entries: Mutex<VecDeque<HistoryEntry>>,
}

impl CompletionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    pub fn record(&self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        // A poisoned lock only means another recorder panicked mid-push.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<HistoryEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for CompletionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Choice;

    fn entry(prompt: &str) -> HistoryEntry {
        HistoryEntry {
            prompt: prompt.to_string(),
            parameters: GenerationParameters::new(),
            result: CompletionResult {
                prompt: prompt.to_string(),
                choices: vec![Choice {
                    text: format!("re: {prompt}"),
                }],
            },
        }
    }

    #[test]
    fn test_drops_oldest_when_full() {
        let history = CompletionHistory::new(2);
        history.record(entry("a"));
        history.record(entry("b"));
        history.record(entry("c"));

        let prompts: Vec<_> = history.snapshot().into_iter().map(|e| e.prompt).collect();
        assert_eq!(prompts, vec!["b", "c"]);
        assert_eq!(history.last().unwrap().prompt, "c");
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let history = CompletionHistory::new(0);
        history.record(entry("a"));
        assert!(history.is_empty());
    }
}
