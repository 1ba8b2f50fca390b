//! Integration tests for managed block rendering.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uc_blocks::{ImportLine, parse_stylesheet};

fn render(content: &str, imports: &[ImportLine]) -> String {
    parse_stylesheet(content).unwrap().render_with(imports)
}

#[test]
fn test_order_is_preserved() {
    let imports = vec![
        ImportLine::new("mods/a.css", true),
        ImportLine::new("mods/b.css", true),
        ImportLine::new("mods/c.css", true),
    ];
    let out = render("", &imports);
    let a = out.find("mods/a.css").unwrap();
    let b = out.find("mods/b.css").unwrap();
    let c = out.find("mods/c.css").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_block_goes_above_user_rules() {
    let out = render("#nav-bar { display: none; }\n", &[ImportLine::new("mods/a.css", true)]);
    assert_eq!(
        out,
        "/* ucloader:imports */\n@import \"mods/a.css\";\n/* /ucloader:imports */\n#nav-bar { display: none; }\n"
    );
}

#[test]
fn test_disable_then_enable_restores_line() {
    let enabled = render("", &[ImportLine::new("mods/a.css", true)]);
    let disabled = render(&enabled, &[ImportLine::new("mods/a.css", false)]);
    assert!(disabled.contains("/* @import \"mods/a.css\"; */\n"));

    let restored = render(&disabled, &[ImportLine::new("mods/a.css", true)]);
    assert_eq!(restored, enabled);
}

#[test]
fn test_rerender_is_idempotent() {
    let imports = vec![
        ImportLine::new("mods/a.css", true),
        ImportLine::new("mods/b.css", false),
    ];
    let once = render("body {}\n", &imports);
    let twice = render(&once, &imports);
    assert_eq!(once, twice);
}

#[test]
fn test_empty_ledger_keeps_markers() {
    let first = render("x {}\n", &[ImportLine::new("mods/a.css", true)]);
    let emptied = render(&first, &[]);
    assert_eq!(emptied, "/* ucloader:imports */\n/* /ucloader:imports */\nx {}\n");
}

fn import_lines() -> impl Strategy<Value = Vec<ImportLine>> {
    prop::collection::vec(
        ("mods/[a-z0-9_-]{1,8}(/[a-z0-9 _-]{1,8})?\\.css", any::<bool>())
            .prop_map(|(path, enabled)| ImportLine::new(path, enabled)),
        0..8,
    )
}

proptest! {
    #[test]
    fn render_then_parse_round_trips(imports in import_lines()) {
        let out = render("", &imports);
        let parsed = parse_stylesheet(&out).unwrap();
        prop_assert_eq!(parsed.imports(), imports.as_slice());
    }

    #[test]
    fn user_content_survives_render_cycles(
        before in "[a-z#{};: \n]{0,40}",
        after in "[a-z#{};: \n]{0,40}",
        first in import_lines(),
        second in import_lines(),
    ) {
        let seeded = format!(
            "{before}\n/* ucloader:imports */\n/* /ucloader:imports */\n{after}"
        );
        let original_user = parse_stylesheet(&seeded).unwrap().user_content();

        let once = render(&seeded, &first);
        let twice = render(&once, &second);
        let again = render(&twice, &second);

        prop_assert_eq!(parse_stylesheet(&twice).unwrap().user_content(), original_user);
        prop_assert_eq!(twice, again);
    }
}
