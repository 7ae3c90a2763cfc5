use indexmap::IndexMap;
use std::path::PathBuf;
use stencil::config::Settings;
use stencil::model::{Content, Metadata, SkipPolicy, TemplateEntry};
use stencil::strategy::{ConditionalResolver, ResolutionStrategy};
use stencil::syntax::SyntaxPair;

fn text_file(relative: &str, content: &str) -> TemplateEntry {
    TemplateEntry::File {
        metadata: Metadata {
            source_path: PathBuf::from("/template").join(relative),
            target_path: PathBuf::from("/output").join(relative),
            relative_path: relative.to_string(),
        },
        content: Some(Content::Text(content.to_string())),
        skip: SkipPolicy::none(),
    }
}

fn settings_with_flags(flags: &[(&str, bool)]) -> Settings {
    Settings {
        flags: flags.iter().map(|(key, value)| (key.to_string(), *value)).collect(),
        syntax: vec![SyntaxPair::new("~", "~")],
        ..Settings::default()
    }
}

fn resolve(settings: &Settings, content: &str) -> String {
    let entries = vec![text_file("file.txt", content)];
    let resolved = ConditionalResolver.resolve_contents(settings, entries).unwrap();
    resolved[0].text().unwrap().to_string()
}

#[test]
fn test_block_unwrapped_when_flag_true() {
    let settings = settings_with_flags(&[("k", true)]);
    assert_eq!(resolve(&settings, "if~k~\nBODY\nend~k~"), "BODY");
}

#[test]
fn test_block_removed_when_flag_false() {
    let settings = settings_with_flags(&[("k", false)]);
    assert_eq!(resolve(&settings, "if~k~\nBODY\nend~k~"), "");
}

#[test]
fn test_surrounding_lines_preserved() {
    let settings = settings_with_flags(&[("k", false)]);
    assert_eq!(resolve(&settings, "before\nif~k~\nBODY\nend~k~\nafter"), "before\nafter");
}

#[test]
fn test_inverse_block() {
    let settings = settings_with_flags(&[("k", false)]);
    assert_eq!(resolve(&settings, "if!~k~\nBODY\nend!~k~"), "BODY");

    let settings = settings_with_flags(&[("k", true)]);
    assert_eq!(resolve(&settings, "if!~k~\nBODY\nend!~k~"), "");
}

#[test]
fn test_two_flags_resolve_independently() {
    let settings = settings_with_flags(&[("a", true), ("b", false)]);
    assert_eq!(resolve(&settings, "if~a~\nX\nend~a~\nif~b~\nY\nend~b~"), "X");
}

#[test]
fn test_multiple_blocks_for_same_key() {
    let settings = settings_with_flags(&[("k", false)]);
    assert_eq!(resolve(&settings, "if~k~\nA\nend~k~\nkeep\nif~k~\nB\nend~k~"), "keep");
}

#[test]
fn test_mismatched_counts_leave_content_unchanged() {
    let settings = settings_with_flags(&[("k", false)]);
    let content = "if~k~\nBODY";
    assert_eq!(resolve(&settings, content), content);
}

#[test]
fn test_out_of_order_directives_leave_content_unchanged() {
    let settings = settings_with_flags(&[("k", false)]);
    let content = "end~k~\nBODY\nif~k~";
    assert_eq!(resolve(&settings, content), content);
}

#[test]
fn test_any_configured_syntax_matches() {
    let mut settings = settings_with_flags(&[("k", true)]);
    settings.syntax = vec![SyntaxPair::new("~", "~"), SyntaxPair::new("{{", "}}")];
    assert_eq!(resolve(&settings, "if{{k}}\nBODY\nend{{k}}"), "BODY");
}

#[test]
fn test_idempotent_on_resolved_output() {
    let settings = settings_with_flags(&[("k", true)]);
    let once = resolve(&settings, "if~k~\nBODY\nend~k~");
    let twice = resolve(&settings, &once);
    assert_eq!(once, twice);
}

#[test]
fn test_count_caps_at_terminator_count() {
    let settings = settings_with_flags(&[("k", true)]);

    let entries = vec![text_file("a.txt", "if~k~\nBODY\nend~k~")];
    let counts = ConditionalResolver.count(&settings, &entries);
    assert_eq!(counts.get("k"), Some(&1));

    // Unterminated block does not inflate the tally.
    let entries = vec![text_file("a.txt", "if~k~\nif~k~\nBODY\nend~k~")];
    let counts = ConditionalResolver.count(&settings, &entries);
    assert_eq!(counts.get("k"), Some(&1));
}

#[test]
fn test_count_zero_after_resolution() {
    let settings = settings_with_flags(&[("k", true)]);
    let entries = vec![text_file("a.txt", "if~k~\nBODY\nend~k~")];

    let before = ConditionalResolver.count(&settings, &entries);
    assert_eq!(before.get("k"), Some(&1));

    let resolved = ConditionalResolver.resolve_contents(&settings, entries).unwrap();
    let after = ConditionalResolver.count(&settings, &resolved);
    assert_eq!(after.get("k"), Some(&0));
}

#[test]
fn test_unaccounted_reports_undeclared_tokens() {
    let settings = settings_with_flags(&[("k", true)]);
    let entries = vec![text_file("src/app.cs", "if~typo~\nBODY\nend~typo~")];

    let leftovers = ConditionalResolver.unaccounted(&settings, &entries);
    assert_eq!(leftovers.len(), 1);
    assert_eq!(leftovers[0].path, "src/app.cs");
    assert_eq!(leftovers[0].token, "if~typo~");
}

#[test]
fn test_empty_flags_is_a_no_op() {
    let settings = Settings { syntax: vec![SyntaxPair::new("~", "~")], ..Settings::default() };
    let content = "if~k~\nBODY\nend~k~";
    assert_eq!(resolve(&settings, content), content);

    let counts = ConditionalResolver.count(&settings, &[text_file("a.txt", content)]);
    assert_eq!(counts, IndexMap::<String, usize>::new());
}
