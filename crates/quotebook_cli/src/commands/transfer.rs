//! Import and export commands.

use quotebook_core::QuoteStore;
use quotebook_storage::KvStore;
use std::io::Write;
use std::path::Path;

/// Appends the quotes in `file` to the store.
///
/// Nothing is added unless every entry in the file is valid.
pub fn import<S: KvStore>(
    store: &mut QuoteStore<S>,
    file: &Path,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("Error reading JSON file {}: {e}", file.display()))?;
    let count = store.import_json(&json)?;
    writeln!(out, "Quotes imported successfully! ({count} added)")?;
    Ok(())
}

/// Writes the quote list as pretty JSON to `output`, or to `out` if none.
pub fn export<S: KvStore>(
    store: &QuoteStore<S>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = store.export_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), count = store.len(), "exported quotes");
        }
        None => writeln!(out, "{json}")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotebook_core::INVALID_IMPORT_FORMAT;
    use quotebook_testkit::{memory_store, persisted, quotes, stored_json};

    #[test]
    fn export_then_import_into_another_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotes.json");
        let (source, _) = memory_store(&quotes(&[("A", "X"), ("B", "Y")]));
        export(&source, Some(&path), &mut Vec::new()).unwrap();

        let (mut target, backend) = memory_store(&quotes(&[("C", "Z")]));
        let mut out = Vec::new();
        import(&mut target, &path, &mut out).unwrap();

        assert_eq!(
            persisted(&backend),
            Some(quotes(&[("C", "Z"), ("A", "X"), ("B", "Y")]))
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Quotes imported successfully! (2 added)\n"
        );
    }

    #[test]
    fn export_to_stdout_is_pretty() {
        let list = quotes(&[("A", "X")]);
        let (store, _) = memory_store(&list);
        let mut out = Vec::new();

        export(&store, None, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", stored_json(&list)));
    }

    #[test]
    fn import_rejects_non_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"text":"A","category":"X"}"#).unwrap();
        let (mut store, backend) = memory_store(&quotes(&[("C", "Z")]));

        let err = import(&mut store, &path, &mut Vec::new()).unwrap_err();

        assert!(err.to_string().contains(INVALID_IMPORT_FORMAT));
        assert_eq!(persisted(&backend), Some(quotes(&[("C", "Z")])));
    }

    #[test]
    fn import_missing_file() {
        let (mut store, _) = memory_store(&[]);
        let err = import(&mut store, Path::new("/nonexistent/q.json"), &mut Vec::new()).unwrap_err();
        assert!(err.to_string().starts_with("Error reading JSON file"));
    }
}
