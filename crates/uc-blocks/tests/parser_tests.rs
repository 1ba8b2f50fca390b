//! Integration tests for managed block parsing.

use pretty_assertions::assert_eq;
use rstest::rstest;
use uc_blocks::{Error, ImportLine, parse_stylesheet, parse_stylesheet_bytes};

#[test]
fn test_no_block_returns_no_imports() {
    let css = "#nav-bar { display: none; }\n@import \"legacy.css\";\n";
    let sheet = parse_stylesheet(css).unwrap();
    assert!(!sheet.has_block());
    assert!(sheet.imports().is_empty());
    assert_eq!(sheet.user_content(), css);
}

#[test]
fn test_active_and_disabled_imports_in_order() {
    let css = r#"/* ucloader:imports */
@import "mods/nord/mod.css";
/* @import "mods/compact.css"; */
@import url('mods/tabs.css');
/* /ucloader:imports */
"#;
    let sheet = parse_stylesheet(css).unwrap();
    assert_eq!(
        sheet.imports(),
        &[
            ImportLine::new("mods/nord/mod.css", true),
            ImportLine::new("mods/compact.css", false),
            ImportLine::new("mods/tabs.css", true),
        ]
    );
}

#[test]
fn test_imports_outside_block_are_user_content() {
    let css = r#"@import "before.css";
/* ucloader:imports */
@import "mods/a.css";
/* /ucloader:imports */
@import "after.css";
"#;
    let sheet = parse_stylesheet(css).unwrap();
    assert_eq!(sheet.imports(), &[ImportLine::new("mods/a.css", true)]);
    assert_eq!(
        sheet.user_content(),
        "@import \"before.css\";\n@import \"after.css\";\n"
    );
}

#[test]
fn test_unrecognized_lines_inside_block_are_kept() {
    let css = r#"/* ucloader:imports */
@import "mods/a.css";
@import "print.css" print;

/* /ucloader:imports */
"#;
    let sheet = parse_stylesheet(css).unwrap();
    let block = sheet.block().unwrap();
    assert_eq!(block.imports.len(), 1);
    assert_eq!(
        block.passthrough,
        vec!["@import \"print.css\" print;".to_string(), String::new()]
    );
}

#[test]
fn test_second_block_is_user_content() {
    let css = r#"/* ucloader:imports */
@import "mods/a.css";
/* /ucloader:imports */
/* ucloader:imports */
@import "mods/b.css";
/* /ucloader:imports */
"#;
    let sheet = parse_stylesheet(css).unwrap();
    assert_eq!(sheet.imports().len(), 1);
    assert!(sheet.user_content().contains("mods/b.css"));
}

#[rstest]
#[case("/* ucloader:imports */\n", 1)]
#[case("a {}\n\n/* ucloader:imports */\n@import \"mods/a.css\";", 3)]
fn test_unterminated_block_reports_start_line(#[case] css: &str, #[case] line: usize) {
    assert_eq!(parse_stylesheet(css), Err(Error::UnterminatedBlock { line }));
}

#[test]
fn test_end_marker_without_trailing_newline() {
    let css = "/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */";
    let sheet = parse_stylesheet(css).unwrap();
    assert_eq!(sheet.imports().len(), 1);
    assert_eq!(sheet.user_content(), "");
}

#[test]
fn test_nested_start_marker_is_passthrough() {
    let css = "/* ucloader:imports */\n/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */\n";
    let sheet = parse_stylesheet(css).unwrap();
    let block = sheet.block().unwrap();
    assert_eq!(block.imports, vec![ImportLine::new("mods/a.css", true)]);
    assert_eq!(block.passthrough, vec!["/* ucloader:imports */".to_string()]);
}

#[test]
fn test_latin1_user_content_is_not_decoded() {
    let css = b"/* caf\xE9 */\n/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */\n";
    let sheet = parse_stylesheet_bytes(css).unwrap();
    assert_eq!(sheet.imports(), &[ImportLine::new("mods/a.css", true)]);
    assert_eq!(sheet.user_bytes(), b"/* caf\xE9 */\n".to_vec());
}
