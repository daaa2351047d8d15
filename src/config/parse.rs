//! INI tokenizer: `[Section]` headers and `key = value` lines.
//!
//! Minimal line-oriented parsing without external dependencies. Keys are
//! case-insensitive; section names are kept verbatim since they double as
//! display names.

use std::collections::BTreeMap;

use super::{ConfigStore, ParseWarning};

/// Parse INI text into a store + warnings.
pub(crate) fn parse_ini(text: &str) -> (ConfigStore, Vec<ParseWarning>) {
    let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    let mut warnings = Vec::new();
    let mut current: Option<String> = None;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            match header.strip_suffix(']') {
                Some(name) if !name.trim().is_empty() => {
                    let name = name.trim().to_string();
                    sections.entry(name.clone()).or_default();
                    current = Some(name);
                }
                _ => warnings.push(ParseWarning::LineMalformed {
                    line: line_no,
                    text: String::from(line),
                }),
            }
            continue;
        }

        let Some((key, value)) = split_pair(line) else {
            warnings.push(ParseWarning::LineMalformed {
                line: line_no,
                text: String::from(line),
            });
            continue;
        };

        let Some(section) = &current else {
            warnings.push(ParseWarning::KeyOutsideSection {
                line: line_no,
                key: String::from(key),
            });
            continue;
        };

        let entries = sections.entry(section.clone()).or_default();
        let key = key.to_ascii_lowercase();
        if entries.contains_key(&key) {
            warnings.push(ParseWarning::DuplicateKey {
                section: section.clone(),
                key: key.clone(),
                value: String::from(value),
            });
        }
        entries.insert(key, String::from(value));
    }

    (ConfigStore { sections }, warnings)
}

/// Split `key = value` or `key: value` at the first delimiter.
/// Keys must be non-empty; values may be empty.
fn split_pair(line: &str) -> Option<(&str, &str)> {
    let at = line.find(['=', ':'])?;
    let key = line[..at].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[at + 1..].trim()))
}

/// Parse a bool-like value. `true`, `on`, `yes` and `1` are true
/// (case-insensitive); anything else is false.
pub(crate) fn parse_bool(value: &str) -> bool {
    ["true", "on", "yes", "1"]
        .iter()
        .any(|t| value.trim().eq_ignore_ascii_case(t))
}

/// Parse a finite float.
pub(crate) fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_and_keys() {
        let (store, warnings) = parse_ini("[Config]\ncrop = 10\npadding: on\n\n[DP-1]\noffsetX=12.5\n");
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(store.get("Config", "crop"), Some("10"));
        assert_eq!(store.get("Config", "padding"), Some("on"));
        assert_eq!(store.get("DP-1", "offsetX"), Some("12.5"));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let (store, _) = parse_ini("[HDMI-1]\nOffsetXFrom = DP-1\n");
        assert_eq!(store.get("HDMI-1", "offsetxfrom"), Some("DP-1"));
        assert_eq!(store.get("HDMI-1", "OFFSETXFROM"), Some("DP-1"));
    }

    #[test]
    fn section_names_are_case_sensitive() {
        let (store, _) = parse_ini("[dp-1]\noffsetX = 1\n");
        assert_eq!(store.get("DP-1", "offsetX"), None);
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let (store, warnings) = parse_ini("# top\n; also\n[Config]\n\n  # indented\ncrop=5\n");
        assert!(warnings.is_empty());
        assert_eq!(store.get("Config", "crop"), Some("5"));
    }

    #[test]
    fn duplicate_key_warns_last_wins() {
        let (store, warnings) = parse_ini("[Config]\ncrop=5\ncrop=7\n");
        assert_eq!(store.get("Config", "crop"), Some("7"));
        assert!(
            warnings
                .iter()
                .any(|w| matches!(w, ParseWarning::DuplicateKey { key, .. } if key == "crop"))
        );
    }

    #[test]
    fn key_before_any_section_warns() {
        let (_, warnings) = parse_ini("crop=5\n[Config]\n");
        assert!(matches!(
            warnings.as_slice(),
            [ParseWarning::KeyOutsideSection { line: 1, .. }]
        ));
    }

    #[test]
    fn malformed_lines_warn() {
        let (_, warnings) = parse_ini("[Config\njust words\n= value\n");
        assert_eq!(warnings.len(), 3);
        assert!(
            warnings
                .iter()
                .all(|w| matches!(w, ParseWarning::LineMalformed { .. }))
        );
    }

    #[test]
    fn bool_like_values() {
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("On"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("maybe"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn floats_must_be_finite() {
        assert_eq!(parse_f64(" 12.5 "), Some(12.5));
        assert_eq!(parse_f64("-3"), Some(-3.0));
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_f64("inf"), None);
        assert_eq!(parse_f64("ten"), None);
    }
}
