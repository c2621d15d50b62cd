const COMMENT_CHAR: char = ';';

fn strip_comment(raw: &str) -> &str {
    match raw.find(COMMENT_CHAR) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

fn normalize_line(raw: &str) -> String {
    strip_comment(raw).trim().to_uppercase()
}

/// Turns raw source text into the normalized lines the rest of the assembler consumes:
/// one entry per source line, comment-stripped, trimmed and uppercased.
pub fn normalize(source: &str) -> Vec<String> {
    source.lines().map(normalize_line).collect()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_comments_and_case() {
        assert_eq!(
            normalize("start:   ; entry point\n  lda 0x010 ;load\n; only a comment\n\thlt"),
            vec!["START:", "LDA 0X010", "", "HLT"]
        );
    }

    #[test]
    fn keeps_line_numbering() {
        assert_eq!(normalize("\n\nhlt\n").len(), 3);
        assert_eq!(normalize("a\r\nb").len(), 2);
    }

    #[test]
    fn empty_source() {
        assert!(normalize("").is_empty());
    }
}
