//! Backslash-escaping of the fpdf syntax characters (`spec.md` §4.7):
//! `\;`, `\!`, `\=`, `\{`, `\}`, `\\` are replaced with private sentinel
//! bytes before comment-stripping and body-splitting run, then restored
//! when a token is finally emitted. Using sentinel bytes rather than
//! deferring the unescape (as a naive "skip one char" scanner would) means
//! every later stage — comment detection, brace matching, `;`-splitting —
//! can treat the string as plain text without re-checking for escapes.

const ESCAPED: [(char, char); 6] = [
    (';', '\u{E000}'),
    ('!', '\u{E001}'),
    ('=', '\u{E002}'),
    ('{', '\u{E003}'),
    ('}', '\u{E004}'),
    ('\\', '\u{E005}'),
];

/// Replaces `\c` with a sentinel for each special character `c`, so the
/// caller's subsequent comment/brace/semicolon scanning never sees an
/// escaped occurrence. Mirrors `replace_specials`.
pub fn replace_specials(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if let Some(&(_, sentinel)) = ESCAPED.iter().find(|(esc, _)| *esc == next) {
                    out.push(sentinel);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Restores sentinel bytes back to their literal characters. Mirrors
/// `getback_specials`; applied once, to a finished token, right before it
/// reaches the caller.
pub fn getback_specials(token: &str) -> String {
    let mut out = token.to_string();
    for (literal, sentinel) in ESCAPED {
        out = out.replace(sentinel, &literal.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_semicolon_survives_split() {
        let replaced = replace_specials("a\\;b;c");
        let parts: Vec<&str> = replaced.split(';').collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(getback_specials(parts[0]), "a;b");
        assert_eq!(getback_specials(parts[1]), "c");
    }

    #[test]
    fn unescaped_text_round_trips() {
        let s = "plain text, no escapes here";
        assert_eq!(getback_specials(&replace_specials(s)), s);
    }

    #[test]
    fn escaped_backslash_itself() {
        let replaced = replace_specials("a\\\\b");
        assert_eq!(getback_specials(&replaced), "a\\b");
    }
}
