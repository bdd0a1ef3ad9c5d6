// Question unit segmentation.
//
// Splits a quiz document's flattened text into labeled question units using
// a declarative label pattern. Accepted labels, case-insensitively:
//
//   Q1   Q1:   Q1.   Q1)   Question 1   Question 1:   Question 1.   Question 1)
//   1:   1.    1)            (bare digits need a separator and no leading zero)
//
// Split-with-captured-delimiter semantics: each label starts a unit that
// runs until the next label or end of text. Text before the first label has
// no question to attach to and is discarded. A "1." sitting mid-sentence as
// a list marker will mis-segment — accepted heuristic limitation.

use std::sync::OnceLock;

use regex_lite::Regex;

/// Label alternatives × separator alternatives. The separator is optional
/// after the Q/Question forms and required after bare digits.
const LABEL_PATTERN: &str = r"(?i)(?:Q(?:uestion)?\s*\d+[:.)]?|[1-9]\d*[:.)])";

fn label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LABEL_PATTERN).expect("label pattern is valid"))
}

/// Split flattened quiz text into `"<label> <question text>"` units, in
/// document order.
pub fn segment_questions(full_text: &str) -> Vec<String> {
    let matches: Vec<_> = label_regex().find_iter(full_text).collect();

    let mut units = Vec::with_capacity(matches.len());
    for (i, label) in matches.iter().enumerate() {
        let content_end = matches
            .get(i + 1)
            .map_or(full_text.len(), |next| next.start());
        let content = full_text[label.end()..content_end].trim();
        units.push(format!("{} {}", label.as_str().trim(), content));
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_labels_and_discards_intro() {
        let units = segment_questions("Intro text. Q1: What is X? Q2) Explain Y.");
        assert_eq!(units, vec!["Q1: What is X?", "Q2) Explain Y."]);
    }

    #[test]
    fn final_label_with_no_content_is_kept_empty() {
        let units = segment_questions("Q1: Define hashing. Q2:");
        assert_eq!(units.len(), 2);
        assert_eq!(units[0], "Q1: Define hashing.");
        assert_eq!(units[1], "Q2: ");
    }

    #[test]
    fn question_word_form_is_accepted() {
        let units = segment_questions("Question 1: First. Question 2. Second.");
        assert_eq!(units, vec!["Question 1: First.", "Question 2. Second."]);
    }

    #[test]
    fn bare_number_with_separator_is_a_label() {
        let units = segment_questions("3) Explain BFS. 4. Explain DFS.");
        assert_eq!(units, vec!["3) Explain BFS.", "4. Explain DFS."]);
    }

    #[test]
    fn multi_digit_bare_labels_work() {
        let units = segment_questions("10) Tenth question.");
        assert_eq!(units, vec!["10) Tenth question."]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let units = segment_questions("q1: lower. QUESTION 2: upper.");
        assert_eq!(units, vec!["q1: lower.", "QUESTION 2: upper."]);
    }

    #[test]
    fn q_form_without_separator_is_accepted() {
        let units = segment_questions("Q1 What is a heap?");
        assert_eq!(units, vec!["Q1 What is a heap?"]);
    }

    #[test]
    fn no_labels_yields_no_units() {
        assert!(segment_questions("Just prose with no markers.").is_empty());
        assert!(segment_questions("").is_empty());
    }

    #[test]
    fn labels_spanning_lines_split_correctly() {
        let units = segment_questions("Q1: What is X?\nQ2: What is Y?");
        assert_eq!(units, vec!["Q1: What is X?", "Q2: What is Y?"]);
    }
}
