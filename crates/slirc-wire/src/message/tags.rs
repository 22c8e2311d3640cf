//! IRCv3 message tag helpers.
//!
//! Tags are kept raw on [`RawMessage`](super::RawMessage); these helpers
//! split and unescape them on demand.

/// Unescape a tag value from wire format.
///
/// `\:` → `;`, `\s` → space, `\\` → `\`, `\r` → CR, `\n` → LF. Any other
/// escaped character stands for itself and a lone trailing backslash is
/// dropped.
pub fn unescape_tag_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut iter = value.chars();
    while let Some(c) = iter.next() {
        let r = if c == '\\' {
            match iter.next() {
                Some(':') => ';',
                Some('s') => ' ',
                Some('\\') => '\\',
                Some('r') => '\r',
                Some('n') => '\n',
                Some(c) => c,
                None => break,
            }
        } else {
            c
        };
        unescaped.push(r);
    }
    unescaped
}

/// Iterate over `(key, raw_value)` pairs of a raw tags section.
///
/// Empty entries (from `;;`) are skipped. A key without `=` has no value.
pub fn split_tags(raw: &str) -> impl Iterator<Item = (&str, Option<&str>)> {
    raw.split(';').filter(|s| !s.is_empty()).map(|tag| {
        let mut iter = tag.splitn(2, '=');
        let key = iter.next().unwrap_or("");
        (key, iter.next())
    })
}
