//! Marker lines and the import-line grammar.
//!
//! Rendered form is always canonical:
//!
//! ```text
//! @import "mods/a.css";          (active)
//! /* @import "mods/a.css"; */    (disabled)
//! ```
//!
//! Parsing is more tolerant and also accepts `url("…")`, `url('…')`,
//! bare `url(…)` and single-quoted targets, with any surrounding whitespace.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Line that opens the managed block.
pub const START_MARKER: &str = "/* ucloader:imports */";

/// Line that closes the managed block.
pub const END_MARKER: &str = "/* /ucloader:imports */";

/// Import target: a quoted string or a `url(...)` form.
const TARGET: &str = r#"(?:url\(\s*(?:"(?P<u1>[^"\n]+)"|'(?P<u2>[^'\n]+)'|(?P<u3>[^"'\s)]+))\s*\)|"(?P<q1>[^"\n]+)"|'(?P<q2>[^'\n]+)')"#;

static ACTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*@import\s+{TARGET}\s*;\s*$")).expect("Invalid active import regex")
});

static DISABLED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*/\*\s*@import\s+{TARGET}\s*;?\s*\*/\s*$"))
        .expect("Invalid disabled import regex")
});

static STATEMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^\s*@import\s+{TARGET}")).expect("Invalid import statement regex")
});

/// Targets of the active `@import` statements anywhere in `content`, in order.
///
/// Media queries or layer clauses after the target are allowed. Commented-out
/// imports are not returned.
///
/// # Example
/// ```
/// use uc_blocks::grammar::import_targets;
///
/// let css = "@import url(\"parts/a.css\") screen;\n/* @import \"b.css\"; */\n@import 'c.css';\n";
/// assert_eq!(import_targets(css), ["parts/a.css", "c.css"]);
/// ```
pub fn import_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| STATEMENT_REGEX.captures(line))
        .filter_map(|caps| target(&caps))
        .collect()
}

/// One import statement inside the managed block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportLine {
    /// Path of the imported stylesheet, relative to the chrome directory.
    pub path: String,
    /// Disabled imports are rendered commented out.
    pub enabled: bool,
}

impl ImportLine {
    pub fn new(path: impl Into<String>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
        }
    }

    /// Parse a single line (without its line terminator).
    ///
    /// Returns `None` for anything that is not an import line.
    ///
    /// # Example
    /// ```
    /// use uc_blocks::ImportLine;
    ///
    /// let line = ImportLine::parse("/* @import url('mods/a.css'); */").unwrap();
    /// assert_eq!(line.path, "mods/a.css");
    /// assert!(!line.enabled);
    /// assert!(ImportLine::parse("#nav-bar { display: none; }").is_none());
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        if let Some(caps) = ACTIVE_REGEX.captures(line) {
            return target(&caps).map(|path| Self::new(path, true));
        }
        if let Some(caps) = DISABLED_REGEX.captures(line) {
            return target(&caps).map(|path| Self::new(path, false));
        }
        None
    }

    /// Render the canonical form of this line (without a line terminator).
    ///
    /// # Example
    /// ```
    /// use uc_blocks::ImportLine;
    ///
    /// assert_eq!(ImportLine::new("mods/a.css", true).render(), r#"@import "mods/a.css";"#);
    /// assert_eq!(ImportLine::new("mods/a.css", false).render(), r#"/* @import "mods/a.css"; */"#);
    /// ```
    pub fn render(&self) -> String {
        if self.enabled {
            format!("@import \"{}\";", self.path)
        } else {
            format!("/* @import \"{}\"; */", self.path)
        }
    }
}

/// Whether `path` can be written into an import line and parsed back unchanged.
pub fn is_renderable_path(path: &str) -> bool {
    !path.is_empty()
        && path.trim() == path
        && !path.contains(['"', '\'', '\n', '\r', '(', ')'])
        && !path.contains("*/")
        && !path.contains("/*")
}

/// Whether a line is the start marker.
pub fn is_start_marker(line: &str) -> bool {
    line.trim() == START_MARKER
}

/// Whether a line is the end marker.
pub fn is_end_marker(line: &str) -> bool {
    line.trim() == END_MARKER
}

fn target(caps: &Captures<'_>) -> Option<String> {
    ["u1", "u2", "u3", "q1", "q2"]
        .iter()
        .find_map(|name| caps.name(name))
        .map(|m| m.as_str().trim().to_string())
        .filter(|path| !path.is_empty())
}
