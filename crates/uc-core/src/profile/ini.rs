//! Minimal reader for `profiles.ini`.
//!
//! Only what the browser writes is supported: `[Section]` headers,
//! `key=value` pairs, and `;`/`#` comment lines. Keys are matched
//! case-insensitively and values are trimmed.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// `1`/`true` as true, `0`/`false` as false, anything else as `None`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.to_ascii_lowercase().as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        }
    }
}

/// Parse INI text into its sections, in file order. Pairs before the first
/// header are ignored.
pub fn parse(content: &str) -> Vec<IniSection> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut sections: Vec<IniSection> = Vec::new();

    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            sections.push(IniSection {
                name: name.trim().to_string(),
                entries: Vec::new(),
            });
            continue;
        }
        let (Some(section), Some((key, value))) = (sections.last_mut(), line.split_once('=')) else {
            continue;
        };
        section
            .entries
            .push((key.trim().to_string(), value.trim().to_string()));
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_pairs() {
        let ini = "\u{feff}; comment\n[General]\nStartWithLastProfile=1\n\n[Profile0]\nName = Default (release)\nIsRelative=1\nPath=Profiles/abc.Default (release)\n";
        let sections = parse(ini);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].name, "Profile0");
        assert_eq!(sections[1].get("name"), Some("Default (release)"));
        assert_eq!(sections[1].get_bool("IsRelative"), Some(true));
        assert_eq!(sections[1].get("Path"), Some("Profiles/abc.Default (release)"));
    }

    #[test]
    fn values_may_contain_equals() {
        let sections = parse("[S]\nk=a=b\n");
        assert_eq!(sections[0].get("k"), Some("a=b"));
    }

    #[test]
    fn pairs_before_any_header_are_ignored() {
        assert!(parse("k=v\n").is_empty());
    }
}
