use serde::{Deserialize, Serialize};

/// Characters per "word" in the standard wpm convention
pub const CHARS_PER_WORD: f64 = 5.0;

/// One committed word, as typed against what was expected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub input_text: String,
    pub expected_text: String,
    pub is_correct: bool,
}

impl Submission {
    /// Exact, case-sensitive comparison. No partial credit.
    pub fn evaluate(input_text: &str, expected_text: &str) -> Self {
        Self {
            input_text: input_text.to_string(),
            expected_text: expected_text.to_string(),
            is_correct: input_text == expected_text,
        }
    }
}

/// Final score of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub wpm: u32,
    pub accuracy_percent: u32,
    pub correct_character_count: usize,
}

/// Sum of expected lengths over correct submissions
pub fn correct_character_count(submissions: &[Submission]) -> usize {
    submissions
        .iter()
        .filter(|s| s.is_correct)
        .map(|s| s.expected_text.chars().count())
        .sum()
}

pub fn accuracy_percent(submissions: &[Submission]) -> u32 {
    if submissions.is_empty() {
        return 0;
    }
    let correct = submissions.iter().filter(|s| s.is_correct).count();
    let total = submissions.len();
    // Integer half-up rounding of 100 * correct / total.
    ((200 * correct + total) / (2 * total)) as u32
}

/// Net wpm: only correct characters are credited. Non-positive elapsed time yields 0.
pub fn net_wpm(correct_chars: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let minutes = elapsed_secs / 60.0;
    ((correct_chars as f64 / CHARS_PER_WORD) / minutes).max(0.0)
}

/// Scores a session whose countdown of `duration_secs` stopped with
/// `remaining_secs` left.
pub fn finalize(submissions: &[Submission], duration_secs: u32, remaining_secs: u32) -> SessionResult {
    let mut elapsed_secs = duration_secs.saturating_sub(remaining_secs);
    if elapsed_secs == 0 {
        elapsed_secs = duration_secs;
    }

    let correct_character_count = correct_character_count(submissions);
    let wpm = net_wpm(correct_character_count, elapsed_secs as f64).round() as u32;

    SessionResult {
        wpm,
        accuracy_percent: accuracy_percent(submissions),
        correct_character_count,
    }
}
