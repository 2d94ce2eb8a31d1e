//! Whitespace normalization for comment and code text.

/// Strip the indentation shared by every non-blank line and all trailing
/// whitespace. The number of lines is preserved.
pub fn dedent<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let indent = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            if line.trim().is_empty() {
                return String::new();
            }
            let skip = line
                .char_indices()
                .take(indent)
                .last()
                .map_or(0, |(i, c)| i + c.len_utf8());
            line[skip..].trim_end().to_string()
        })
        .collect()
}

/// Remove leading and trailing blank lines, dedent, and join with `\n`.
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> String {
    let first = lines.iter().position(|l| !l.as_ref().trim().is_empty());
    let last = lines.iter().rposition(|l| !l.as_ref().trim().is_empty());

    match (first, last) {
        (Some(first), Some(last)) => dedent(&lines[first..=last]).join("\n"),
        _ => String::new(),
    }
}

/// Normalize a single piece of text that may span several lines.
pub fn normalize_text(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    normalize(&lines)
}
