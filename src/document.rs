//! Input-document cleanup.
//!
//! The document text may arrive annotated with directive lines belonging to
//! the host document format. Those lines must be removed before the text is
//! treated as XML input.

/// Removes every line that begins with the host's block-directive marker.
///
/// Stripping is idempotent. An empty marker strips nothing. Line endings
/// are normalized to `\n`; a trailing newline on the input is preserved.
pub fn strip_directive_lines(text: &str, marker: &str) -> String {
    if marker.is_empty() {
        return text.to_string();
    }

    let kept: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with(marker))
        .collect();

    let mut stripped = kept.join("\n");
    if text.ends_with('\n') && !stripped.is_empty() {
        stripped.push('\n');
    }

    stripped
}
