// ── Name canonicalization ──
//
// ISE group names use `#` as the hierarchy separator and reject `/` and
// parentheses inside a segment.

/// Make a free-text name safe for use as an ISE group segment.
///
/// Replaces every `/` with `-` and removes every `(` and `)`.
pub fn canonicalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c == '/' { '-' } else { c })
        .collect()
}
