//! `spec.md` §3 "Groups": a keyed table of textual `"k=v"` entries that
//! `<group_name>` tokens in a directive body are spliced with in-place.

use std::collections::HashMap;

use crate::error::ParseWarning;

#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    groups: HashMap<String, Vec<String>>,
}

impl GroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// `@group { group_name=…; k1=v1; k2=v2 }` (re)definition: `entries`
    /// are the raw `"k=v"` strings, verbatim, for later splicing.
    pub fn define(&mut self, name: impl Into<String>, entries: Vec<String>) {
        self.groups.insert(name.into(), entries);
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Looks up `group`'s `key=v1 v2 v3` entry and splits its value on
    /// whitespace into a `keyword_value_list` (`spec.md` §8 scenario S6):
    /// the per-iteration values a `<keyword:key>` codeword cycles through.
    pub fn keyword_values(&self, group: &str, key: &str) -> Option<Vec<String>> {
        let entries = self.groups.get(group)?;
        let prefix = format!("{key}=");
        let raw = entries.iter().find_map(|e| e.strip_prefix(&prefix))?;
        Some(raw.split_whitespace().map(str::to_string).collect())
    }

    /// Replaces every `<name>` token in `body` with its group's entries,
    /// joined by `; `. Tokens naming an undefined group are left
    /// unexpanded and reported as a warning rather than failing the parse
    /// (`spec.md` §7 "unknown group name" is non-fatal).
    pub fn expand(&self, body: &str, directive_line: usize, warnings: &mut Vec<ParseWarning>) -> String {
        let mut out = String::with_capacity(body.len());
        let mut rest = body;
        while let Some(open) = rest.find('<') {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];
            match after_open.find('>') {
                Some(close) => {
                    let name = &after_open[..close];
                    match self.get(name) {
                        Some(entries) => out.push_str(&entries.join("; ")),
                        None => {
                            warnings.push(ParseWarning::UnknownGroup {
                                directive_line,
                                group_name: name.to_string(),
                            });
                            out.push('<');
                            out.push_str(name);
                            out.push('>');
                        }
                    }
                    rest = &after_open[close + 1..];
                }
                None => {
                    out.push('<');
                    rest = after_open;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_group() {
        let mut table = GroupTable::new();
        table.define("G", vec!["outline=red".into(), "line_width=2".into()]);
        let mut warnings = Vec::new();
        let out = table.expand("width=1; height=1; <G>", 1, &mut warnings);
        assert_eq!(out, "width=1; height=1; outline=red; line_width=2");
        assert!(warnings.is_empty());
    }

    #[test]
    fn keyword_values_splits_on_whitespace() {
        let mut table = GroupTable::new();
        table.define("G", vec!["tag=A B C".into()]);
        assert_eq!(table.keyword_values("G", "tag"), Some(vec!["A".into(), "B".into(), "C".into()]));
        assert_eq!(table.keyword_values("G", "missing"), None);
        assert_eq!(table.keyword_values("missing_group", "tag"), None);
    }

    #[test]
    fn unknown_group_left_unexpanded_with_warning() {
        let table = GroupTable::new();
        let mut warnings = Vec::new();
        let out = table.expand("<missing>", 3, &mut warnings);
        assert_eq!(out, "<missing>");
        assert_eq!(warnings.len(), 1);
    }
}
