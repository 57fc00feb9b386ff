//! Text fitting: greedy word wrap and ellipsis truncation.
//!
//! Lengths are counted in characters, not bytes.

/// Greedily wrap `text` into lines of at most `max_chars` characters.
///
/// Words are split on whitespace and never broken; a word longer than
/// `max_chars` sits alone on its own line. Empty input gives no lines.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line.is_empty() {
            line.push_str(word);
            line_len = word_len;
        } else if line_len + 1 + word_len <= max_chars {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            line_len = word_len;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Shorten `text` to `max_len` characters, ending in `...` when cut
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wrap_empty_input() {
        assert!(wrap("", 10).is_empty());
        assert!(wrap("", 0).is_empty());
        assert!(wrap("   \t ", 10).is_empty());
    }

    #[test]
    fn wrap_short_text_is_one_line() {
        assert_eq!(wrap("Design review", 28), vec!["Design review"]);
    }

    #[test]
    fn wrap_breaks_at_budget() {
        assert_eq!(
            wrap("the quick brown fox jumps over", 10),
            vec!["the quick", "brown fox", "jumps over"]
        );
        // Exactly at the budget stays on the line
        assert_eq!(wrap("abcd efghi", 10), vec!["abcd efghi"]);
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(
            wrap("a supercalifragilistic word", 8),
            vec!["a", "supercalifragilistic", "word"]
        );
    }

    #[test]
    fn wrap_collapses_whitespace() {
        assert_eq!(wrap("  spaced \n  out\ttext ", 40), vec!["spaced out text"]);
    }

    #[test]
    fn wrap_never_exceeds_budget_except_single_words() {
        let text = "Migrate billing services to the new event bus and retire the legacy cron jobs";
        for budget in 1..40 {
            for line in wrap(text, budget) {
                let len = line.chars().count();
                assert!(len <= budget || !line.contains(' '), "{line:?} > {budget}");
            }
        }
    }

    #[test]
    fn wrap_counts_characters() {
        assert_eq!(wrap("héllo wörld", 11), vec!["héllo wörld"]);
    }

    #[test]
    fn truncate_within_limit() {
        assert_eq!(truncate("Short", 20), "Short");
        assert_eq!(truncate("exactly20characters!", 20), "exactly20characters!");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        let cut = truncate("This is a very long task name", 15);
        assert_eq!(cut, "This is a ve...");
        assert_eq!(cut.chars().count(), 15);
    }

    #[test]
    fn truncate_multibyte() {
        assert_eq!(truncate("ääääääääää", 5), "ää...");
    }

    #[test]
    fn truncate_tiny_budget() {
        assert_eq!(truncate("abcdef", 2), "...");
    }
}
