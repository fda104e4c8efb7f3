//! Codeword expansion for `@file_name`'s `dir=`/`name=` values and other
//! directive parameters (`spec.md` §4.8): `<default>`, `<home>`, `<psout>`,
//! `<pdf>`, `<year>`, `<v_hour>`, `<p_hr_min>`, `<iteration>`,
//! `<iteration_attribute>`. Unknown codewords are a non-fatal semantic
//! warning (`spec.md` §7, §8 testable property 8 "codeword idempotence").

use std::collections::HashMap;

/// The run-time values codewords resolve against — supplied by
/// `gpg-engine`/`gpg-config`, which own the process identity, the active
/// loop iteration, and the valid-time clock.
#[derive(Debug, Clone, Default)]
pub struct CodewordContext {
    pub default_dir: String,
    pub home_dir: String,
    pub psout_dir: String,
    pub pdf_dir: String,
    pub year: String,
    pub v_hour: String,
    pub p_hr_min: String,
    pub iteration: String,
    pub iteration_attribute: String,
    /// Extra codewords contributed by an active `@loop_location_look_up`
    /// table or similar, keyed without angle brackets.
    pub extra: HashMap<String, String>,
}

impl CodewordContext {
    fn resolve(&self, name: &str) -> Option<&str> {
        match name {
            "default" => Some(self.default_dir.as_str()),
            "home" => Some(self.home_dir.as_str()),
            "psout" => Some(self.psout_dir.as_str()),
            "pdf" => Some(self.pdf_dir.as_str()),
            "year" => Some(self.year.as_str()),
            "v_hour" => Some(self.v_hour.as_str()),
            "p_hr_min" => Some(self.p_hr_min.as_str()),
            "iteration" => Some(self.iteration.as_str()),
            "iteration_attribute" => Some(self.iteration_attribute.as_str()),
            other => self.extra.get(other).map(String::as_str),
        }
    }
}

/// Expands every `<codeword>` token in `text`. Returns the expanded text
/// plus the list of codeword names that had no resolution (left
/// unexpanded in place, per the non-fatal "unknown codeword" policy).
/// A string with no `<…>` tokens is returned unchanged — property 8.
pub fn expand_codewords(text: &str, ctx: &CodewordContext) -> (String, Vec<String>) {
    if !text.contains('<') {
        return (text.to_string(), Vec::new());
    }

    let mut out = String::with_capacity(text.len());
    let mut unknown = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) => {
                let name = &after[..close];
                match ctx.resolve(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        unknown.push(name.to_string());
                        out.push('<');
                        out.push_str(name);
                        out.push('>');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    (out, unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_codewords() {
        let ctx = CodewordContext { v_hour: "00".into(), ..Default::default() };
        let (out, unknown) = expand_codewords("t_<v_hour>.ps", &ctx);
        assert_eq!(out, "t_00.ps");
        assert!(unknown.is_empty());
    }

    #[test]
    fn string_without_tokens_is_unchanged() {
        let ctx = CodewordContext::default();
        let (out, unknown) = expand_codewords("plain_name.ps", &ctx);
        assert_eq!(out, "plain_name.ps");
        assert!(unknown.is_empty());
    }

    #[test]
    fn unknown_codeword_left_in_place() {
        let ctx = CodewordContext::default();
        let (out, unknown) = expand_codewords("<bogus>.ps", &ctx);
        assert_eq!(out, "<bogus>.ps");
        assert_eq!(unknown, vec!["bogus".to_string()]);
    }
}
