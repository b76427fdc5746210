/// Unquoted identifiers, or double-quoted ones with `""` escapes.
///
/// Unquoted identifiers are limited to ASCII; anything else makes the
/// surrounding pattern fail and the statement goes unclassified.
pub(crate) const IDENTIFIER: &str = r#"(?:"(?:[^"]|"")+"|[A-Za-z_][A-Za-z0-9_$]*)"#;

/// Identifiers keep their original case; quoted ones lose the quotes.
pub(crate) fn unquote_identifier(raw: &str) -> String {
    match raw
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => raw.to_string(),
    }
}

/// `[schema.]name` with named groups `{prefix}_schema` and `{prefix}_name`.
pub(crate) fn qualified_name_pattern(prefix: &str) -> String {
    format!(
        r"(?:(?P<{prefix}_schema>{IDENTIFIER})\s*\.\s*)?(?P<{prefix}_name>{IDENTIFIER})"
    )
}
