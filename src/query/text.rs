//! Text normalization shared by query analysis and feature extraction.

/// Lowercases and replaces everything except letters, digits, `+` and `#` with
/// single spaces.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '+' || c == '#' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Collapses runs of whitespace and trims.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whole-word phrase containment over normalized strings.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() || haystack.is_empty() {
        return false;
    }
    if haystack == phrase {
        return true;
    }
    let padded = format!(" {haystack} ");
    padded.contains(&format!(" {phrase} "))
}
