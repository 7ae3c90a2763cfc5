use std::path::PathBuf;
use stencil::config::Settings;
use stencil::model::{Content, Metadata, SkipPolicy, TemplateEntry};
use stencil::strategy::{InlineFlagResolver, ResolutionStrategy};
use stencil::syntax::SyntaxPair;

fn entry_at(relative: &str) -> TemplateEntry {
    TemplateEntry::File {
        metadata: Metadata {
            source_path: PathBuf::from("/template").join(relative),
            target_path: PathBuf::from("/output").join(relative),
            relative_path: relative.to_string(),
        },
        content: None,
        skip: SkipPolicy::none(),
    }
}

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

#[test]
fn test_false_flag_drops_entry() {
    let settings = settings_with_flags(&[("a", false)]);
    let entries = vec![entry_at("flag~a~dir/file.txt")];

    let resolved = InlineFlagResolver.resolve_paths(&settings, entries).unwrap();
    assert!(resolved.is_empty());
}

#[test]
fn test_true_flag_strips_token_from_target_path() {
    let settings = settings_with_flags(&[("a", true)]);
    let entries = vec![entry_at("flag~a~dir/file.txt")];

    let resolved = InlineFlagResolver.resolve_paths(&settings, entries).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].metadata().target_path, PathBuf::from("/output/dir/file.txt"));
    // Provenance: the relative path keeps its original spelling.
    assert_eq!(resolved[0].metadata().relative_path, "flag~a~dir/file.txt");
}

#[test]
fn test_inverse_token_drops_entry_when_flag_true() {
    let settings = settings_with_flags(&[("a", true)]);
    let entries = vec![entry_at("flag!~a~file.txt")];

    let resolved = InlineFlagResolver.resolve_paths(&settings, entries).unwrap();
    assert!(resolved.is_empty());
}

#[test]
fn test_skip_policy_shields_path_surface() {
    let settings = settings_with_flags(&[("a", false)]);
    let mut entry = entry_at("flag~a~file.txt");
    if let TemplateEntry::File { skip, .. } = &mut entry {
        skip.paths.inline_flag = true;
    }

    let resolved = InlineFlagResolver.resolve_paths(&settings, vec![entry]).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].metadata().relative_path, "flag~a~file.txt");
}

#[test]
fn test_false_flag_drops_line() {
    let settings = settings_with_flags(&[("a", false)]);
    let entries = vec![text_file("file.txt", "keep\nuses feature flag~a~\nkeep too")];

    let resolved = InlineFlagResolver.resolve_contents(&settings, entries).unwrap();
    assert_eq!(resolved[0].text(), Some("keep\nkeep too"));
}

#[test]
fn test_true_flag_strips_token_from_line() {
    let settings = settings_with_flags(&[("a", true)]);
    let entries = vec![text_file("file.txt", "line with flag~a~ token")];

    let resolved = InlineFlagResolver.resolve_contents(&settings, entries).unwrap();
    assert_eq!(resolved[0].text(), Some("line with  token"));
}

#[test]
fn test_comment_prefix_stripped_with_token() {
    let mut settings = settings_with_flags(&[("a", true)]);
    settings.comments = vec!["// ".to_string()];
    let entries = vec![text_file("file.txt", "doSomething(); // flag~a~")];

    let resolved = InlineFlagResolver.resolve_contents(&settings, entries).unwrap();
    assert_eq!(resolved[0].text(), Some("doSomething(); "));
}

#[test]
fn test_content_preserved_when_skip_policy_gates_content() {
    let settings = settings_with_flags(&[("a", false)]);
    let mut entry = text_file("file.txt", "line flag~a~");
    if let TemplateEntry::File { skip, .. } = &mut entry {
        skip.contents.inline_flag = true;
    }

    let resolved = InlineFlagResolver.resolve_contents(&settings, vec![entry]).unwrap();
    assert_eq!(resolved[0].text(), Some("line flag~a~"));
}

#[test]
fn test_count_spans_path_and_content() {
    let settings = settings_with_flags(&[("a", true)]);
    let entries = vec![text_file("flag~a~dir/file.txt", "flag~a~ and flag~a~")];

    let counts = InlineFlagResolver.count(&settings, &entries);
    assert_eq!(counts.get("a"), Some(&3));
}

#[test]
fn test_count_respects_surface_gates() {
    let settings = settings_with_flags(&[("a", true)]);
    let mut entry = text_file("flag~a~dir/file.txt", "flag~a~");
    if let TemplateEntry::File { skip, .. } = &mut entry {
        skip.paths.inline_flag = true;
    }

    let counts = InlineFlagResolver.count(&settings, &[entry]);
    assert_eq!(counts.get("a"), Some(&1));
}

#[test]
fn test_any_configured_syntax_matches() {
    let mut settings = settings_with_flags(&[("a", false)]);
    settings.syntax = vec![SyntaxPair::new("~", "~"), SyntaxPair::new("{{", "}}")];
    let entries = vec![entry_at("flag{{a}}file.txt")];

    let resolved = InlineFlagResolver.resolve_paths(&settings, entries).unwrap();
    assert!(resolved.is_empty());
}

#[test]
fn test_folders_are_filtered_like_files() {
    let settings = settings_with_flags(&[("a", false)]);
    let entries = vec![TemplateEntry::Folder {
        metadata: Metadata {
            source_path: PathBuf::from("/template/flag~a~dir"),
            target_path: PathBuf::from("/output/flag~a~dir"),
            relative_path: "flag~a~dir".to_string(),
        },
        skip: SkipPolicy::none(),
    }];

    let resolved = InlineFlagResolver.resolve_paths(&settings, entries).unwrap();
    assert!(resolved.is_empty());
}
