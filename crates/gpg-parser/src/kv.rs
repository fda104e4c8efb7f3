//! Splits a directive body into keyword entries (`dissect_body`) and
//! re-serialises them back — the inverse operation exists purely to
//! support `spec.md` §8 testable property 7, "parser round-trip".

use crate::error::ParseError;
use crate::escape::getback_specials;

/// Matches the fpdf keyword-buffer size (`GPGMedium` in the original);
/// a keyword entry longer than this could not have been a legitimate
/// directive parameter.
const MAX_ENTRY_LEN: usize = 512;

/// One parsed `key = value` or bare `value` entry. Values are unquoted if
/// they arrived wrapped in matching `"..."` or `'...'`.
#[derive(Debug, Clone, PartialEq)]
pub struct KvEntry {
    pub key: Option<String>,
    pub value: String,
}

impl KvEntry {
    pub fn bare(value: impl Into<String>) -> Self {
        Self { key: None, value: value.into() }
    }

    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: Some(key.into()), value: value.into() }
    }

    /// Re-serialises to the same textual form `dissect_body` would accept,
    /// used by the round-trip property test.
    pub fn to_source(&self) -> String {
        match &self.key {
            Some(k) => format!("{k}={}", &self.value),
            None => self.value.clone(),
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

/// Splits a brace-stripped, escape-sentinelled directive body on `;` into
/// `KvEntry` values. `line` is used only for error messages. Mirrors
/// `dissect_body`'s keyword/value split and multiple-`=` detection.
pub fn dissect_body(body: &str, line: usize) -> Result<Vec<KvEntry>, ParseError> {
    let trimmed = body.trim();
    let inner = trimmed.strip_prefix('{').unwrap_or(trimmed);
    let inner = inner.strip_suffix('}').unwrap_or(inner);

    let mut entries = Vec::new();
    for raw in inner.split(';') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        if raw.len() > MAX_ENTRY_LEN {
            return Err(ParseError::TokenTooLong { line, len: raw.len() });
        }
        let eq_count = raw.matches('=').count();
        if eq_count > 1 {
            return Err(ParseError::MultipleEquals { line, entry: getback_specials(raw) });
        }
        let entry = if let Some(pos) = raw.find('=') {
            let key = getback_specials(raw[..pos].trim());
            let value = getback_specials(strip_quotes(raw[pos + 1..].trim()));
            KvEntry::pair(key, value)
        } else {
            KvEntry::bare(getback_specials(strip_quotes(raw)))
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Re-serialises a full entry list back into a `dissect_body`-compatible
/// body string (`"k1=v1; k2=v2; bare"`).
pub fn serialize_body(entries: &[KvEntry]) -> String {
    entries.iter().map(KvEntry::to_source).collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_mixed_kv_and_bare_entries() {
        let entries = dissect_body("{ outline=red; line_width=2; noisy }", 1).unwrap();
        assert_eq!(
            entries,
            vec![
                KvEntry::pair("outline", "red"),
                KvEntry::pair("line_width", "2"),
                KvEntry::bare("noisy"),
            ]
        );
    }

    #[test]
    fn strips_matching_quotes() {
        let entries = dissect_body("{ name=\"t file.ps\" }", 1).unwrap();
        assert_eq!(entries, vec![KvEntry::pair("name", "t file.ps")]);
    }

    #[test]
    fn multiple_equals_is_an_error() {
        let err = dissect_body("{ a=b=c }", 7).unwrap_err();
        assert!(matches!(err, ParseError::MultipleEquals { line: 7, .. }));
    }

    #[test]
    fn round_trip_preserves_pair_list() {
        let original = dissect_body("{ dir=<default>; name=t_<v_hour>.ps }", 1).unwrap();
        let reserialized = serialize_body(&original);
        let reparsed = dissect_body(&format!("{{ {reserialized} }}"), 1).unwrap();
        assert_eq!(original, reparsed);
    }
}
