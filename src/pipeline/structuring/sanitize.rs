// Normalize upstream review text before it is split and segmented.
// Removes invisible Unicode that would hide headings from the matcher,
// unifies line endings, and strips echoed line-number prefixes.

use std::sync::LazyLock;

use regex::Regex;

/// `12|` at the start of a line, as produced when the model echoes
/// numbered source lines back into its answer.
static LINE_NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\d+\|").unwrap());

/// Prepare a raw upstream response for structuring: unify line endings and
/// drop invisible formatting characters.
pub fn normalize_response(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    remove_invisible_chars(&unified)
}

/// Remove invisible Unicode characters and non-whitespace control characters.
/// Preserves space, newline and tab.
pub fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if *c == ' ' || *c == '\n' || *c == '\t' {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'  // Zero-width space
                | '\u{200C}' // Zero-width non-joiner
                | '\u{200D}' // Zero-width joiner
                | '\u{200E}' // Left-to-right mark
                | '\u{200F}' // Right-to-left mark
                | '\u{202A}' // Left-to-right embedding
                | '\u{202B}' // Right-to-left embedding
                | '\u{202C}' // Pop directional formatting
                | '\u{202D}' // Left-to-right override
                | '\u{202E}' // Right-to-left override
                | '\u{2060}' // Word joiner
                | '\u{FEFF}' // BOM / zero-width no-break space
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

/// Strip `<digits>|` prefixes from the start of every line.
///
/// Only for narrative text: v4 item rows legitimately start with a number
/// followed by the field separator.
pub fn strip_line_numbers(text: &str) -> String {
    LINE_NUMBER_PREFIX.replace_all(text, "").into_owned()
}
