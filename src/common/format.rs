use colored::*;

use crate::catalog::SemanticVersion;

/// Render versions as a bracketed list, e.g. `[1.0.0-alpha, 1.0.0-beta]`
pub fn format_versions<'a, I>(versions: I) -> String
where
    I: IntoIterator<Item = &'a SemanticVersion>,
{
    let joined = versions
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

/// Format version count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 version".to_string()
    } else {
        format!("{} versions", count)
    }
}

/// Format a day count, e.g. for the max-age threshold
pub fn format_days(days: u64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Colorize a removal count: nothing to do is dim, anything else stands out
pub fn format_count_colored(count: usize) -> ColoredString {
    let s = format_count(count);
    if count == 0 {
        s.dimmed()
    } else {
        s.yellow().bold()
    }
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_versions() {
        let versions: Vec<SemanticVersion> = ["1.0.0-alpha", "1.0.0-beta"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(format_versions(&versions), "[1.0.0-alpha, 1.0.0-beta]");
        assert_eq!(format_versions(&Vec::<SemanticVersion>::new()), "[]");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0 versions");
        assert_eq!(format_count(1), "1 version");
        assert_eq!(format_count(42), "42 versions");
    }

    #[test]
    fn test_format_days() {
        assert_eq!(format_days(1), "1 day");
        assert_eq!(format_days(14), "14 days");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("abcd", 3), "...");
    }
}
