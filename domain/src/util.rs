//! Shared text helpers.

/// Shorten `s` to at most `max_chars` characters, ending in `…` when cut.
///
/// Counts characters, not bytes, so accented answers are never split.
pub fn ellipsize(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ellipsize_short_is_unchanged() {
        assert_eq!(ellipsize("klant", 10), "klant");
    }

    #[test]
    fn ellipsize_counts_chars() {
        assert_eq!(ellipsize("financiën", 6), "finan…");
        assert_eq!(ellipsize("één", 3), "één");
        assert_eq!(ellipsize("abc", 0), "");
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("  klant\n\n centraal  "), "klant centraal");
    }
}
