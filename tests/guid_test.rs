use std::cell::Cell;
use std::path::PathBuf;
use stencil::config::Settings;
use stencil::model::{Content, Metadata, SkipPolicy, TemplateEntry};
use stencil::strategy::{GuidGenerator, GuidResolver, ResolutionStrategy};

struct SequenceGenerator(Cell<usize>);

impl SequenceGenerator {
    fn new() -> Self {
        Self(Cell::new(0))
    }
}

impl GuidGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        let n = self.0.get();
        self.0.set(n + 1);
        format!("fresh-{}", n)
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

fn settings_with_guids(guids: &[&str]) -> Settings {
    Settings {
        guids: guids.iter().map(|guid| guid.to_string()).collect(),
        ..Settings::default()
    }
}

#[test]
fn test_case_insensitive_replacement() {
    let settings = settings_with_guids(&["ABCD-1"]);
    let entries = vec![text_file("file.txt", "abcd-1 and ABCD-1")];

    let resolver = GuidResolver::new(Box::new(SequenceGenerator::new()));
    let resolved = resolver.resolve_contents(&settings, entries).unwrap();
    assert_eq!(resolved[0].text(), Some("fresh-0 and fresh-0"));
}

#[test]
fn test_same_guid_shares_replacement_across_files() {
    let settings = settings_with_guids(&["ABCD-1"]);
    let entries = vec![text_file("a.txt", "abcd-1"), text_file("b.txt", "ABCD-1")];

    let resolver = GuidResolver::new(Box::new(SequenceGenerator::new()));
    let resolved = resolver.resolve_contents(&settings, entries).unwrap();
    assert_eq!(resolved[0].text(), Some("fresh-0"));
    assert_eq!(resolved[1].text(), Some("fresh-0"));
}

#[test]
fn test_distinct_guids_get_distinct_replacements() {
    let settings = settings_with_guids(&["AAAA-1", "BBBB-2"]);
    let entries = vec![text_file("a.txt", "aaaa-1 bbbb-2")];

    let resolver = GuidResolver::new(Box::new(SequenceGenerator::new()));
    let resolved = resolver.resolve_contents(&settings, entries).unwrap();
    assert_eq!(resolved[0].text(), Some("fresh-0 fresh-1"));
}

#[test]
fn test_count_is_case_insensitive() {
    let settings = settings_with_guids(&["ABCD-1"]);
    let entries = vec![text_file("a.txt", "abcd-1, Abcd-1 and ABCD-1")];

    let resolver = GuidResolver::new(Box::new(SequenceGenerator::new()));
    let counts = resolver.count(&settings, &entries);
    assert_eq!(counts.get("ABCD-1"), Some(&3));
}

#[test]
fn test_binary_entries_pass_through() {
    let settings = settings_with_guids(&["ABCD-1"]);
    let entry = TemplateEntry::File {
        metadata: Metadata {
            source_path: PathBuf::from("/template/logo.png"),
            target_path: PathBuf::from("/output/logo.png"),
            relative_path: "logo.png".to_string(),
        },
        content: Some(Content::Binary(vec![0xFF, 0xD8])),
        skip: SkipPolicy::none(),
    };

    let resolver = GuidResolver::new(Box::new(SequenceGenerator::new()));
    let resolved = resolver.resolve_contents(&settings, vec![entry.clone()]).unwrap();
    assert_eq!(resolved[0], entry);
}

#[test]
fn test_paths_are_not_touched() {
    let settings = settings_with_guids(&["ABCD-1"]);
    let entries = vec![text_file("abcd-1.txt", "")];

    let resolver = GuidResolver::new(Box::new(SequenceGenerator::new()));
    let resolved = resolver.resolve_paths(&settings, entries).unwrap();
    assert_eq!(resolved[0].metadata().target_path, PathBuf::from("/output/abcd-1.txt"));
}
