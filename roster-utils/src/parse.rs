/// Parse a loose boolean flag such as `1`, `true`, `yes`, `on` (or their negatives).
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Normalize a URL path prefix: empty or `/` means "mount at root",
/// anything else gains a leading slash and loses trailing ones.
pub fn normalize_path_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_path_prefix, parse_flag};

    #[test]
    fn parses_common_flag_spellings() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" TRUE "), Some(true));
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn normalizes_path_prefixes() {
        assert_eq!(normalize_path_prefix(""), "");
        assert_eq!(normalize_path_prefix("/"), "");
        assert_eq!(normalize_path_prefix("rest"), "/rest");
        assert_eq!(normalize_path_prefix("/rest/"), "/rest");
        assert_eq!(normalize_path_prefix(" /api/v1 "), "/api/v1");
    }
}
