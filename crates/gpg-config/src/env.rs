//! Resolved environment/codeword directory map (`spec.md` §6 "Environment
//! and paths"), the ambient path-resolution surface codeword expansion and
//! `@file_name` need. This is *not* a reimplementation of the FPA
//! setup-file format (`spec.md` §1 Non-goals) — it is a small TOML-backed
//! map the way the teacher's `core-config` loads `oxidized.toml`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct DirectoryMap {
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub psout: String,
    #[serde(default)]
    pub svgout: String,
    #[serde(default)]
    pub corout: String,
    #[serde(default)]
    pub texout: String,
    #[serde(default)]
    pub psmet: String,
    #[serde(default)]
    pub svgmet: String,
    #[serde(default)]
    pub cormet: String,
    #[serde(default)]
    pub texmet: String,
    #[serde(default)]
    pub include: String,
    /// Extra codewords beyond the fixed set above, as they appear in
    /// `<name>` path/filename expansions.
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl DirectoryMap {
    /// Looks up a codeword by name, checking the fixed fields first and
    /// falling back to `extra`.
    pub fn get(&self, codeword: &str) -> Option<&str> {
        match codeword {
            "home" => Some(self.home.as_str()),
            "psout" => Some(self.psout.as_str()),
            "svgout" => Some(self.svgout.as_str()),
            "corout" => Some(self.corout.as_str()),
            "texout" => Some(self.texout.as_str()),
            "psmet" => Some(self.psmet.as_str()),
            "svgmet" => Some(self.svgmet.as_str()),
            "cormet" => Some(self.cormet.as_str()),
            "texmet" => Some(self.texmet.as_str()),
            "include" => Some(self.include.as_str()),
            other => self.extra.get(other).map(String::as_str),
        }
        .filter(|s| !s.is_empty())
    }

    /// Expands every `<codeword>` token in `text`, leaving unknown
    /// codewords in place (the caller decides whether that's a warning).
    pub fn expand(&self, text: &str) -> (String, Vec<String>) {
        let mut out = String::with_capacity(text.len());
        let mut unknown = Vec::new();
        let mut rest = text;
        while let Some(start) = rest.find('<') {
            let Some(end) = rest[start..].find('>') else {
                out.push_str(rest);
                rest = "";
                break;
            };
            out.push_str(&rest[..start]);
            let name = &rest[start + 1..start + end];
            match self.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    unknown.push(name.to_string());
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                }
            }
            rest = &rest[start + end + 1..];
        }
        out.push_str(rest);
        (out, unknown)
    }
}

#[derive(Debug, Default, Clone)]
pub struct Environment {
    pub raw: Option<String>,
    pub directories: DirectoryMap,
}

/// Platform-convention discovery of a `gpg.toml` directory map, preferring
/// the working directory over a platform config directory.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("gpg.toml");
    if local.exists() {
        return local;
    }
    PathBuf::from("gpg.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Environment, ConfigError> {
    let path = path.unwrap_or_else(discover);
    load_path(&path)
}

fn load_path(path: &Path) -> Result<Environment, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Ok(Environment::default()),
    };
    let directories: DirectoryMap = toml::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?;
    Ok(Environment { raw: Some(content), directories })
}
