//! Splits a stylesheet into user content and the managed import block.

use crate::error::{Error, Result};
use crate::grammar::{ImportLine, is_end_marker, is_start_marker};

/// The managed block found in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedBlock {
    /// Recognised import lines, in file order.
    pub imports: Vec<ImportLine>,
    /// Lines inside the block that are not import lines (blank lines and
    /// nested markers included), kept verbatim after the imports.
    pub passthrough: Vec<String>,
    /// The 1-based line number of the start marker.
    pub start_line: usize,
    /// The 1-based line number of the end marker.
    pub end_line: usize,
}

/// A parsed stylesheet: the bytes before the block, the block, and the bytes after.
///
/// Text outside the block is held as raw bytes, so a stylesheet that is not
/// UTF-8 is carried through a render unchanged. When the stylesheet has no
/// block, `prefix` is empty and the whole file is held in `suffix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub(crate) prefix: Vec<u8>,
    pub(crate) block: Option<ManagedBlock>,
    pub(crate) suffix: Vec<u8>,
    pub(crate) line_ending: &'static str,
}

impl Stylesheet {
    /// The managed block, if the stylesheet has one.
    pub fn block(&self) -> Option<&ManagedBlock> {
        self.block.as_ref()
    }

    pub fn has_block(&self) -> bool {
        self.block.is_some()
    }

    /// Import lines of the managed block; empty when there is no block.
    pub fn imports(&self) -> &[ImportLine] {
        self.block
            .as_ref()
            .map(|b| b.imports.as_slice())
            .unwrap_or(&[])
    }

    /// Everything outside the managed block, concatenated, byte for byte.
    pub fn user_bytes(&self) -> Vec<u8> {
        [self.prefix.as_slice(), self.suffix.as_slice()].concat()
    }

    /// [`Stylesheet::user_bytes`] as text; invalid UTF-8 is replaced.
    pub fn user_content(&self) -> String {
        String::from_utf8_lossy(&self.user_bytes()).into_owned()
    }

    /// Line terminator used when rendering (`"\r\n"` if the file uses CRLF).
    pub fn line_ending(&self) -> &'static str {
        self.line_ending
    }
}

/// Parse stylesheet text. See [`parse_stylesheet_bytes`].
///
/// # Example
/// ```
/// use uc_blocks::parse_stylesheet;
///
/// let css = "/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */\n#nav-bar {}\n";
/// let sheet = parse_stylesheet(css).unwrap();
/// assert_eq!(sheet.imports().len(), 1);
/// assert_eq!(sheet.user_content(), "#nav-bar {}\n");
/// ```
pub fn parse_stylesheet(content: &str) -> Result<Stylesheet> {
    parse_stylesheet_bytes(content.as_bytes())
}

/// Parse stylesheet content as read from disk.
///
/// Only the first block is managed; a stray end marker with no start marker
/// before it, and any later block, are ordinary user content. Only lines
/// inside the block are decoded.
///
/// # Errors
/// Returns [`Error::UnterminatedBlock`] when a start marker has no end marker
/// after it, since the block boundary is then ambiguous.
pub fn parse_stylesheet_bytes(content: &[u8]) -> Result<Stylesheet> {
    let line_ending = if content.windows(2).any(|w| w == b"\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    let mut offset = 0;
    let mut open: Option<(usize, usize)> = None;
    let mut imports = Vec::new();
    let mut passthrough = Vec::new();

    for (idx, raw) in content.split_inclusive(|&b| b == b'\n').enumerate() {
        let line_no = idx + 1;
        let line_start = offset;
        offset += raw.len();
        let line = String::from_utf8_lossy(trim_eol(raw));

        let Some((start_line, block_start)) = open else {
            if is_start_marker(&line) {
                open = Some((line_no, line_start));
            }
            continue;
        };

        if is_end_marker(&line) {
            tracing::debug!(
                start_line,
                end_line = line_no,
                imports = imports.len(),
                "parsed managed block"
            );
            return Ok(Stylesheet {
                prefix: content[..block_start].to_vec(),
                block: Some(ManagedBlock {
                    imports,
                    passthrough,
                    start_line,
                    end_line: line_no,
                }),
                suffix: content[offset..].to_vec(),
                line_ending,
            });
        }

        if is_start_marker(&line) {
            tracing::warn!(line = line_no, "nested start marker inside managed block kept as-is");
        } else if let Some(import) = ImportLine::parse(&line) {
            imports.push(import);
            continue;
        }
        passthrough.push(line.into_owned());
    }

    if let Some((start_line, _)) = open {
        return Err(Error::UnterminatedBlock { line: start_line });
    }

    Ok(Stylesheet {
        prefix: Vec::new(),
        block: None,
        suffix: content.to_vec(),
        line_ending,
    })
}

fn trim_eol(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let sheet = parse_stylesheet("").unwrap();
        assert!(!sheet.has_block());
        assert!(sheet.imports().is_empty());
    }

    #[test]
    fn test_parse_block_positions() {
        let css = "a {}\n/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */\nb {}\n";
        let sheet = parse_stylesheet(css).unwrap();
        let block = sheet.block().unwrap();
        assert_eq!(block.start_line, 2);
        assert_eq!(block.end_line, 4);
        assert_eq!(sheet.prefix, b"a {}\n");
        assert_eq!(sheet.suffix, b"b {}\n");
    }

    #[test]
    fn test_unterminated_block() {
        let css = "x {}\n/* ucloader:imports */\n@import \"mods/a.css\";\n";
        assert_eq!(
            parse_stylesheet(css),
            Err(Error::UnterminatedBlock { line: 2 })
        );
    }

    #[test]
    fn test_stray_end_marker_is_user_content() {
        let css = "/* /ucloader:imports */\n@import \"legacy.css\";\n";
        let sheet = parse_stylesheet(css).unwrap();
        assert!(!sheet.has_block());
        assert_eq!(sheet.user_content(), css);
    }

    #[test]
    fn test_non_utf8_outside_block_kept_raw() {
        let css = b"/* caf\xE9 */\n/* ucloader:imports */\n/* /ucloader:imports */\nb {}\n";
        let sheet = parse_stylesheet_bytes(css).unwrap();
        assert_eq!(sheet.prefix, b"/* caf\xE9 */\n");
        assert_eq!(sheet.user_bytes(), b"/* caf\xE9 */\nb {}\n");
    }

    #[test]
    fn test_crlf_detected() {
        let sheet = parse_stylesheet("a {}\r\nb {}\r\n").unwrap();
        assert_eq!(sheet.line_ending(), "\r\n");
    }
}
