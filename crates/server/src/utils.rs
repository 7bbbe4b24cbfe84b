//! Small helpers shared by handlers.

/// Escape LIKE wildcards (`%`, `_`) and the escape character itself, for use
/// with `ESCAPE '\'`.
pub fn escape_like_wildcards(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
