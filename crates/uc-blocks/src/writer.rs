//! Renders the managed block and splices it back into a stylesheet.

use crate::grammar::{END_MARKER, ImportLine, START_MARKER};
use crate::parser::Stylesheet;

/// Render a complete managed block, markers included, each line terminated by `eol`.
///
/// # Example
/// ```
/// use uc_blocks::{ImportLine, render_block};
///
/// let block = render_block(&[ImportLine::new("mods/a.css", true)], &[], "\n");
/// assert_eq!(
///     block,
///     "/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */\n"
/// );
/// ```
pub fn render_block(imports: &[ImportLine], passthrough: &[String], eol: &str) -> String {
    let mut out = String::new();
    out.push_str(START_MARKER);
    out.push_str(eol);
    for import in imports {
        out.push_str(&import.render());
        out.push_str(eol);
    }
    for line in passthrough {
        out.push_str(line);
        out.push_str(eol);
    }
    out.push_str(END_MARKER);
    out.push_str(eol);
    out
}

impl Stylesheet {
    /// Produce the full stylesheet with the managed block replaced by `imports`.
    ///
    /// An existing block is replaced in place. Without one, a new block goes
    /// at the very top of the file (after a leading `@charset` rule), because
    /// CSS ignores `@import` rules that follow any other rule. Bytes outside
    /// the block are copied unchanged.
    pub fn render_bytes(&self, imports: &[ImportLine]) -> Vec<u8> {
        let eol = self.line_ending;
        let mut out = Vec::with_capacity(self.prefix.len() + self.suffix.len() + 256);
        match &self.block {
            Some(block) => {
                out.extend_from_slice(&self.prefix);
                out.extend_from_slice(render_block(imports, &block.passthrough, eol).as_bytes());
                out.extend_from_slice(&self.suffix);
            }
            None => {
                let (head, tail) = self.suffix.split_at(insertion_point(&self.suffix));
                out.extend_from_slice(head);
                if !head.is_empty() && !head.ends_with(b"\n") {
                    out.extend_from_slice(eol.as_bytes());
                }
                out.extend_from_slice(render_block(imports, &[], eol).as_bytes());
                out.extend_from_slice(tail);
            }
        }
        out
    }

    /// [`Stylesheet::render_bytes`] as text. Lossy only for stylesheets that
    /// are not UTF-8; write [`Stylesheet::render_bytes`] to disk instead.
    pub fn render_with(&self, imports: &[ImportLine]) -> String {
        String::from_utf8_lossy(&self.render_bytes(imports)).into_owned()
    }
}

/// Byte offset where a fresh block is inserted: just past a leading `@charset` line.
fn insertion_point(content: &[u8]) -> usize {
    const BOM: &[u8] = b"\xEF\xBB\xBF";
    let body = content.strip_prefix(BOM).unwrap_or(content);
    let bom = content.len() - body.len();
    match body.split_inclusive(|&b| b == b'\n').next() {
        Some(first) if first.trim_ascii_start().starts_with(b"@charset") => bom + first.len(),
        _ => bom,
    }
}
