//! Host-independent string helpers.

/// Marker appended to text cut by [`truncate_with_ellipsis`]
pub const ELLIPSIS: &str = "...";

/// Whether the string has any non-whitespace content
pub fn has_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Normalize a host name, FQDN or URL into a canonical base URL.
///
/// Blank input stays empty. A missing scheme becomes `http://` and the
/// result always ends with a single `/`, so resources and fragments can be
/// appended directly.
pub fn normalize_host_or_fqdn(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut url = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let without_trailing = url.trim_end_matches('/').len();
    url.truncate(without_trailing);
    url.push('/');
    url
}

/// Remove carriage returns and line feeds
pub fn clean_crlf(value: &str) -> String {
    value.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// Cut `value` to at most `max_chars` characters, ending in [`ELLIPSIS`]
/// when anything was removed. Lengths are counted in chars, not bytes.
pub fn truncate_with_ellipsis(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    let marker_len = ELLIPSIS.chars().count();
    if max_chars <= marker_len {
        return ELLIPSIS.chars().take(max_chars).collect();
    }

    let mut result: String = value.chars().take(max_chars - marker_len).collect();
    result.push_str(ELLIPSIS);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("", "" ; "empty stays empty")]
    #[test_case("   ", "" ; "blank stays empty")]
    #[test_case("chat.example.com", "http://chat.example.com/" ; "bare host")]
    #[test_case("https://chat.example.com", "https://chat.example.com/" ; "adds trailing slash")]
    #[test_case(" https://chat.example.com/api/v1// ", "https://chat.example.com/api/v1/" ; "collapses trailing slashes")]
    #[test_case("localhost:3000/api/v1", "http://localhost:3000/api/v1/" ; "host with port and path")]
    fn test_normalize_host_or_fqdn(input: &str, expected: &str) {
        assert_eq!(normalize_host_or_fqdn(input), expected);
    }

    #[test]
    fn test_clean_crlf() {
        assert_eq!(clean_crlf("line one\r\nline two\n"), "line oneline two");
        assert_eq!(clean_crlf("tab\tkept"), "tab\tkept");
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("short", 255), "short");
        assert_eq!(truncate_with_ellipsis("", 255), "");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "a".repeat(300);
        let result = truncate_with_ellipsis(&text, 255);
        assert_eq!(result.chars().count(), 255);
        assert!(result.ends_with(ELLIPSIS));
        assert!(result.starts_with(&"a".repeat(252)));
    }

    #[test]
    fn test_truncate_counts_chars() {
        let text = "é".repeat(10);
        assert_eq!(truncate_with_ellipsis(&text, 10), text);
        assert_eq!(truncate_with_ellipsis(&text, 5), "éé...");
    }

    #[test]
    fn test_truncate_tiny_limit() {
        assert_eq!(truncate_with_ellipsis("abcdef", 2), "..");
    }

    #[test]
    fn test_has_value() {
        assert!(has_value("x"));
        assert!(!has_value(""));
        assert!(!has_value(" \t"));
    }

    proptest! {
        #[test]
        fn prop_truncated_summary_fits(text in ".{0,600}") {
            let cleaned = clean_crlf(&text);
            let summary = truncate_with_ellipsis(&cleaned, 255);
            prop_assert!(summary.chars().count() <= 255);
            if cleaned.chars().count() > 255 {
                prop_assert!(summary.ends_with(ELLIPSIS));
            } else {
                prop_assert_eq!(summary, cleaned);
            }
        }

        #[test]
        fn prop_clean_crlf_removes_all_line_breaks(text in "[a-z\r\n ]{0,100}") {
            let cleaned = clean_crlf(&text);
            prop_assert!(!cleaned.contains('\r'));
            prop_assert!(!cleaned.contains('\n'));
        }
    }
}
