use egonet_core::EgoConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelOptions {
    pub max_chars_per_line: usize,
    pub max_lines: usize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            max_chars_per_line: 12,
            max_lines: 2,
        }
    }
}

impl LabelOptions {
    pub fn from_config(config: &EgoConfig) -> Self {
        let d = Self::default();
        Self {
            max_chars_per_line: config
                .get_usize("label.maxCharsPerLine")
                .filter(|v| *v > 0)
                .unwrap_or(d.max_chars_per_line),
            max_lines: config
                .get_usize("label.maxLines")
                .filter(|v| *v > 0)
                .unwrap_or(d.max_lines),
        }
    }

    pub fn wrap(&self, name: &str) -> Vec<String> {
        wrap_label(name, self.max_chars_per_line, self.max_lines)
    }
}

/// Greedy word wrap for node labels.
///
/// Tokens are packed left to right while `current + " " + token` stays within
/// `max_chars_per_line` (counted in `char`s). A token longer than the budget is kept whole on its
/// own line. Only the first `max_lines` lines are kept (at least one); the rest is dropped without
/// an ellipsis. Empty or whitespace-only input yields a single empty line.
pub fn wrap_label(name: &str, max_chars_per_line: usize, max_lines: usize) -> Vec<String> {
    let max_lines = max_lines.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for token in name.split_whitespace() {
        let token_len = token.chars().count();
        if current.is_empty() {
            current.push_str(token);
            current_len = token_len;
            continue;
        }
        if current_len + 1 + token_len <= max_chars_per_line {
            current.push(' ');
            current.push_str(token);
            current_len += 1 + token_len;
            continue;
        }
        lines.push(std::mem::take(&mut current));
        if lines.len() == max_lines {
            return lines;
        }
        current.push_str(token);
        current_len = token_len;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines.truncate(max_lines);
    lines
}
