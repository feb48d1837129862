//! `.ibl` manifest parsing.
//!
//! A manifest is a line-oriented, INI-like file:
//!
//! ```text
//! [Header]
//! Name = "Studio"
//!
//! [Enviroment]
//! EVfile = "studio_env.hdr"
//!
//! [Light1]
//! LIGHTcolor = 255,240,220
//! LIGHTmulti = 1.5
//! ```
//!
//! Section and key names are case-insensitive and stored lower-cased. Values
//! are typed by [`coerce`]. There is no schema: unknown sections and keys are
//! kept so consumers can use or ignore them.

use crate::value::{coerce, Value};
use crate::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key injected into the header section holding the manifest's directory.
pub const PATH_KEY: &str = "_path";
pub const HEADER_SECTION: &str = "header";
pub const MANIFEST_EXTENSION: &str = "ibl";

static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(.*)\]$").unwrap());
static ENTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*?)=(.*?)$").unwrap());

pub type Section = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    sections: BTreeMap<String, Section>,
}

impl Manifest {
    /// Reads and parses an `.ibl` file. The extension check is
    /// case-insensitive; the header's `_path` is the file's absolute directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !has_manifest_extension(path) {
            return Err(Error::Format(format!(
                "{} is not an .{} file",
                path.display(),
                MANIFEST_EXTENSION
            )));
        }

        let text = std::fs::read_to_string(path)?;
        let absolute = path.canonicalize()?;
        let dir = absolute.parent().unwrap_or(Path::new(""));

        log::debug!("Parsing manifest {}", absolute.display());
        Self::parse(&text, dir)
    }

    /// Parses manifest text. `dir` becomes the header's `_path`.
    pub fn parse(text: &str, dir: &Path) -> Result<Self> {
        let mut sections: BTreeMap<String, Section> = BTreeMap::new();
        let mut current: Option<String> = None;

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = SECTION_RE.captures(line) {
                let name = normalize_section_name(&caps[1]);
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            if let Some(caps) = ENTRY_RE.captures(line) {
                let Some(section) = current.as_ref().and_then(|name| sections.get_mut(name)) else {
                    log::trace!("Line {}: entry outside of any section, discarded", number + 1);
                    continue;
                };
                let key = caps[1].trim().to_lowercase();
                section.insert(key, coerce(caps[2].trim()));
                continue;
            }

            log::trace!("Line {}: unrecognized, ignored: {:?}", number + 1, line);
        }

        let header = sections
            .get_mut(HEADER_SECTION)
            .ok_or_else(|| Error::Format("missing header".to_string()))?;
        header.insert(
            PATH_KEY.to_string(),
            Value::String(dir.to_string_lossy().into_owned()),
        );

        log::debug!("Parsed manifest with {} sections", sections.len());
        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.sections.get(section)?.get(key)
    }

    /// Directory the manifest was loaded from. Asset paths resolve against it.
    pub fn path(&self) -> PathBuf {
        self.get(HEADER_SECTION, PATH_KEY)
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .unwrap_or_default()
    }

    pub fn header(&self) -> ManifestHeader {
        let text = |key: &str| {
            self.get(HEADER_SECTION, key).map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
        };
        let number = |key: &str| self.get(HEADER_SECTION, key).and_then(Value::as_f32);

        ManifestHeader {
            name: text("name"),
            author: text("author"),
            link: text("link"),
            location: text("location"),
            geolat: number("geolat"),
            geolong: number("geolong"),
            date: text("date"),
            time: text("time"),
            comment: text("comment"),
            path: self.path(),
        }
    }

    /// Sections named `<prefix><N>` (e.g. `light1`, `light12`), sorted by `N`.
    ///
    /// `N` has no upper bound, so it is returned as its decimal text with
    /// leading zeros removed rather than as a fixed-width integer.
    pub fn numbered_sections<'a>(&'a self, prefix: &str) -> Vec<(&'a str, &'a Section)> {
        let mut found: Vec<(&str, &str, &Section)> = self
            .sections
            .iter()
            .filter_map(|(name, section)| {
                let digits = name.strip_prefix(prefix)?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let number = match digits.trim_start_matches('0') {
                    "" => "0",
                    trimmed => trimmed,
                };
                Some((number, name.as_str(), section))
            })
            .collect();
        // Shorter digit strings are smaller numbers; ties keep a stable order
        // between spellings such as `light1` and `light01`.
        found.sort_by_key(|&(number, name, _)| (number.len(), number, name));
        found
            .into_iter()
            .map(|(number, _, section)| (number, section))
            .collect()
    }
}

/// Typed view of the well-known header keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManifestHeader {
    pub name: Option<String>,
    pub author: Option<String>,
    pub link: Option<String>,
    pub location: Option<String>,
    pub geolat: Option<f32>,
    pub geolong: Option<f32>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub comment: Option<String>,
    pub path: PathBuf,
}

pub fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MANIFEST_EXTENSION))
}

fn normalize_section_name(raw: &str) -> String {
    let name = raw.to_lowercase();
    // Misspelling used by the file format itself.
    if name == "enviroment" {
        "environment".to_string()
    } else {
        name
    }
}
