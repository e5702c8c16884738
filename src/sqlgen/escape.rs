/// Quote a value for direct embedding: `'` and `\` are doubled.
pub fn escape_sql_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''").replace('\\', "\\\\"))
}

/// Like [`escape_sql_string`], with `NULL` for an absent value.
pub fn escape_sql_opt(value: Option<&str>) -> String {
    value.map_or_else(|| "NULL".to_string(), escape_sql_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_backslashes_are_doubled() {
        assert_eq!(escape_sql_string(r"it's a \n"), r"'it''s a \\n'");
        assert_eq!(escape_sql_string("''"), "''''''");
        assert_eq!(escape_sql_string(r"\\"), r"'\\\\'");
    }

    #[test]
    fn plain_text_is_only_wrapped() {
        assert_eq!(escape_sql_string("A+B"), "'A+B'");
        assert_eq!(escape_sql_string(""), "''");
        assert_eq!(escape_sql_string("줄\n바꿈"), "'줄\n바꿈'");
    }

    #[test]
    fn absent_is_null() {
        assert_eq!(escape_sql_opt(None), "NULL");
        assert_eq!(escape_sql_opt(Some("x")), "'x'");
    }

    #[test]
    fn escaped_literal_unescapes_back() {
        let original = r"O'Reilly \ path\to 'x'";
        let escaped = escape_sql_string(original);
        let inner = &escaped[1..escaped.len() - 1];
        // no lone quote survives inside the literal
        assert!(!inner.replace("''", "").contains('\''));
        assert_eq!(inner.replace("''", "'").replace("\\\\", "\\"), original);
    }
}
