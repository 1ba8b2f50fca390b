//! Managed import block parsing and rendering for UserChrome Loader.
//!
//! The loader owns one delimited region of `userChrome.css`:
//!
//! ```text
//! /* ucloader:imports */
//! @import "mods/nord/mod.css";
//! /* @import "mods/compact.css"; */
//! /* /ucloader:imports */
//! ```
//!
//! Everything outside the markers belongs to the user and is carried through
//! every render byte for byte. Inside the markers, each line is either an
//! active import, a commented-out (disabled) import, or a line the grammar
//! does not recognise, which is kept verbatim.
//!
//! - [`grammar`]: marker lines and the import-line pattern
//! - [`parser`]: splits a stylesheet into prefix, block and suffix
//! - [`writer`]: renders a block and splices it back into the document

pub mod error;
pub mod grammar;
pub mod parser;
pub mod writer;

pub use error::{Error, Result};
pub use grammar::{END_MARKER, ImportLine, START_MARKER};
pub use parser::{ManagedBlock, Stylesheet, parse_stylesheet, parse_stylesheet_bytes};
pub use writer::render_block;
