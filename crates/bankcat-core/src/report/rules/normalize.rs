//! Raw transcription cleanup.

/// Split raw text into trimmed, whitespace-collapsed, non-empty lines.
///
/// Tabs become spaces and carriage returns are dropped before splitting.
/// Normalizing already normalized text returns it unchanged.
pub fn normalize_lines(raw: &str) -> Vec<String> {
    raw.replace('\t', " ")
        .replace('\r', "")
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

/// [`normalize_lines`] joined back with newlines.
pub fn normalize_text(raw: &str) -> String {
    normalize_lines(raw).join("\n")
}
