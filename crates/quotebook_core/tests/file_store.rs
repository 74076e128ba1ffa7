//! Quote store behaviour over the file backend.

use quotebook_core::{default_quotes, CategoryFilter, QuoteRecord, QuoteStore, QUOTES_KEY};
use quotebook_storage::{FileKvStore, KvStore};
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> QuoteStore<FileKvStore> {
    QuoteStore::open(FileKvStore::open(dir.path()).unwrap())
}

#[test]
fn fresh_directory_starts_with_defaults() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    assert_eq!(store.quotes(), default_quotes().as_slice());
    // Defaults are not written until something is saved.
    assert!(!dir.path().join("quotes.json").exists());
}

#[test]
fn added_quotes_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.add("Stay hungry, stay foolish.", "Life").unwrap();
        store
            .set_selected_category(&CategoryFilter::parse("Life"))
            .unwrap();
    }

    let store = open(&dir);
    assert_eq!(store.len(), 5);
    assert_eq!(
        store.quotes().last(),
        Some(&QuoteRecord::new("Stay hungry, stay foolish.", "Life").unwrap())
    );
    assert_eq!(
        store.selected_category(),
        CategoryFilter::Category("Life".into())
    );
}

#[test]
fn corrupt_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("quotes.json"), "{ not json").unwrap();

    let store = open(&dir);
    assert_eq!(store.quotes(), default_quotes().as_slice());
}

#[test]
fn stored_empty_list_stays_empty() {
    let dir = TempDir::new().unwrap();
    {
        let backend = FileKvStore::open(dir.path()).unwrap();
        backend.set(QUOTES_KEY, "[]").unwrap();
    }

    let store = open(&dir);
    assert!(store.is_empty());
}

#[test]
fn rejected_import_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.add("Keep going.", "Motivation").unwrap();
    let before = fs::read_to_string(dir.path().join("quotes.json")).unwrap();

    let err = store
        .import_json(r#"[{"text":"ok","category":"A"},{"text":"","category":"B"}]"#)
        .unwrap_err();

    assert!(err.is_input_error());
    assert_eq!(
        fs::read_to_string(dir.path().join("quotes.json")).unwrap(),
        before
    );
}
