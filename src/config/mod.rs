//! Configuration file parsing and typed lookups.
//!
//! Parses INI-style text like
//!
//! ```text
//! [Config]
//! crop = 10
//! trim = on
//!
//! [HDMI-1]
//! offsetXFrom = DP-1
//! offsetXMode = F2S
//! offsetX = 25
//! ```
//!
//! into a [`ConfigStore`] and derives [`Settings`] from it. Nothing here is
//! fatal: malformed lines and unparseable values produce [`ParseWarning`]s and
//! fall back to documented defaults, so a layout can always be produced.
//!
//! # Example
//!
//! ```
//! use spanwall::config;
//!
//! let result = config::parse("[Config]\ncrop = 10\npadding = on\n");
//! assert!(result.warnings.is_empty());
//!
//! let (settings, warnings) = config::Settings::from_store(&result.store);
//! assert!(warnings.is_empty());
//! assert_eq!(settings.composition.crop, 10.0);
//! assert!(settings.composition.padding);
//! ```

mod parse;
pub mod settings;

pub use settings::{
    AxisHint, CompositionConfig, DisplayHints, GLOBAL_SECTION, HintTarget, LayoutHints, MAX_CROP,
    Settings, ZERO_ANCHOR,
};

use core::fmt;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::display::ReferenceMode;

/// Result of parsing configuration text.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed sections.
    pub store: ConfigStore,
    /// Non-fatal parse warnings.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from configuration parsing or interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A line is neither a section header, a comment, nor `key = value`.
    LineMalformed { line: usize, text: String },
    /// A key appeared before the first section header.
    KeyOutsideSection { line: usize, key: String },
    /// A key appeared more than once in a section (last value wins).
    DuplicateKey {
        section: String,
        key: String,
        value: String,
    },
    /// A key was recognized but its value could not be used.
    ValueInvalid {
        section: String,
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineMalformed { line, text } => write!(f, "line {line}: cannot parse {text:?}"),
            Self::KeyOutsideSection { line, key } => {
                write!(f, "line {line}: key {key:?} outside any section")
            }
            Self::DuplicateKey {
                section,
                key,
                value,
            } => write!(f, "[{section}] {key}: duplicate key, using {value:?}"),
            Self::ValueInvalid {
                section,
                key,
                value,
                reason,
            } => write!(f, "[{section}] {key} = {value:?}: {reason}"),
        }
    }
}

/// Parse configuration text.
pub fn parse(text: &str) -> ParseResult {
    let (store, warnings) = parse::parse_ini(text);
    ParseResult { store, warnings }
}

/// File name looked up in each configuration directory.
pub const CONFIG_FILE_NAME: &str = "spanwall.ini";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "SPANWALL_CONFIG";

/// Candidate configuration paths in lookup order: the explicit path, then
/// [`CONFIG_FILE_NAME`] inside each directory.
pub fn candidates(
    explicit: Option<PathBuf>,
    dirs: impl IntoIterator<Item = PathBuf>,
) -> Vec<PathBuf> {
    explicit
        .into_iter()
        .chain(dirs.into_iter().map(|d| d.join(CONFIG_FILE_NAME)))
        .collect()
}

/// First candidate that exists as a file.
pub fn locate(candidates: &[PathBuf]) -> Option<&Path> {
    candidates.iter().map(PathBuf::as_path).find(|p| p.is_file())
}

/// Read and interpret the configuration file at `path`.
pub fn load(path: &Path) -> std::io::Result<(Settings, Vec<ParseWarning>)> {
    let text = std::fs::read_to_string(path)?;
    Ok(Settings::from_ini(&text))
}

/// Outcome of a typed lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue<T> {
    /// Key absent.
    Missing,
    /// Key present but its value does not parse; carries the raw text.
    Invalid(String),
    /// Key present and valid.
    Set(T),
}

impl<T> ConfigValue<T> {
    /// The value if set.
    pub fn set(self) -> Option<T> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    /// The value if set, otherwise `default`.
    pub fn unwrap_or(self, default: T) -> T {
        self.set().unwrap_or(default)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

/// Parsed configuration sections. Keys are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigStore {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl ConfigStore {
    /// Raw string value. Empty values count as absent.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// String value.
    pub fn get_str(&self, section: &str, key: &str) -> ConfigValue<&str> {
        match self.get(section, key) {
            Some(v) => ConfigValue::Set(v),
            None => ConfigValue::Missing,
        }
    }

    /// Finite float value.
    pub fn get_f64(&self, section: &str, key: &str) -> ConfigValue<f64> {
        match self.get(section, key) {
            None => ConfigValue::Missing,
            Some(raw) => match parse::parse_f64(raw) {
                Some(v) => ConfigValue::Set(v),
                None => ConfigValue::Invalid(String::from(raw)),
            },
        }
    }

    /// Bool-like value; never invalid, unrecognized text reads as `false`.
    pub fn get_bool(&self, section: &str, key: &str) -> ConfigValue<bool> {
        match self.get(section, key) {
            None => ConfigValue::Missing,
            Some(raw) => ConfigValue::Set(parse::parse_bool(raw)),
        }
    }

    /// Reference mode value.
    pub fn get_mode(&self, section: &str, key: &str) -> ConfigValue<ReferenceMode> {
        match self.get(section, key) {
            None => ConfigValue::Missing,
            Some(raw) => match ReferenceMode::parse(raw) {
                Some(m) => ConfigValue::Set(m),
                None => ConfigValue::Invalid(String::from(raw)),
            },
        }
    }

    /// Section names in sorted order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }
}
