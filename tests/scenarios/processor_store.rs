//! Test: custom processor store on disk

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;
use text_pipeline::persistence::store::{slugify, LEGACY_FILE, PROCESSORS_DIR};
use text_pipeline::persistence::{CustomProcessorDefinition, CustomProcessorStore};

fn stored_files(conf: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(conf.join(PROCESSORS_DIR))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_colliding_names_share_one_file() {
    let dir = tempdir().unwrap();
    let mut store = CustomProcessorStore::new(dir.path());
    store.add_processor("Foo", "return 'upper';").unwrap();
    store.add_processor("foo", "return 'lower';").unwrap();

    assert_eq!(slugify("Foo"), slugify("foo"));
    assert_eq!(store.len(), 2);
    assert_eq!(stored_files(dir.path()), vec!["foo.json".to_string()]);

    let reopened = CustomProcessorStore::open(dir.path()).unwrap();
    assert_eq!(reopened.processors(), vec![CustomProcessorDefinition::new("foo", "return 'lower';")]);
}

#[test]
fn test_legacy_migration_happens_once() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join(LEGACY_FILE),
        r#"{"processors": [
            {"name": "Upper", "script": "return input.toUpperCase();"},
            {"name": "Word Count", "script": "return input.split(' ').length;"}
        ]}"#,
    )
    .unwrap();

    let store = CustomProcessorStore::open(dir.path()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(stored_files(dir.path()), vec!["upper.json".to_string(), "word-count.json".to_string()]);

    // the directory is now the source of truth
    std::fs::remove_file(dir.path().join(LEGACY_FILE)).unwrap();
    let reopened = CustomProcessorStore::open(dir.path()).unwrap();
    assert_eq!(reopened.len(), 2);
    assert!(reopened.find("Word Count").is_some());
}

#[test]
fn test_load_orders_by_file_name() {
    let dir = tempdir().unwrap();
    let processors = dir.path().join(PROCESSORS_DIR);
    std::fs::create_dir_all(&processors).unwrap();
    std::fs::write(processors.join("zeta.json"), r#"{"name": "Zeta", "script": "return 'z';"}"#).unwrap();
    std::fs::write(processors.join("alpha.json"), r#"{"name": "Alpha", "script": "return 'a';"}"#).unwrap();

    let store = CustomProcessorStore::open(dir.path()).unwrap();
    let names: Vec<String> = store.processors().into_iter().map(|def| def.name).collect();
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn test_listeners_fire_on_load_and_each_change() {
    let dir = tempdir().unwrap();
    let mut store = CustomProcessorStore::new(dir.path());
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    store.register_update_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.load_all().unwrap();
    store.add_processor("A", "return 1;").unwrap();
    store.rename_processor(0, "B").unwrap();
    store.edit_processor(0, "B", "return 2;").unwrap();
    store.remove_processor(0).unwrap();
    assert_eq!(fired.load(Ordering::SeqCst), 5);

    // rejected changes do not notify
    assert!(store.add_processor("", "return 3;").is_err());
    assert!(store.remove_processor(0).is_err());
    assert_eq!(fired.load(Ordering::SeqCst), 5);
}

#[test]
fn test_renaming_one_of_two_colliding_keeps_shared_file() {
    let dir = tempdir().unwrap();
    let mut store = CustomProcessorStore::new(dir.path());
    store.add_processor("Tool", "return 1;").unwrap();
    store.add_processor("tool", "return 2;").unwrap();

    store.rename_processor(0, "Other").unwrap();
    assert_eq!(stored_files(dir.path()), vec!["other.json".to_string(), "tool.json".to_string()]);
}
