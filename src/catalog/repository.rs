//! Ordered collection of content libraries awaiting indexing.
//!
//! Registration order is catalog order: when two libraries define the same
//! identifier, the one registered first is the one the index keeps. The
//! manifest loader preserves the order the manifest lists its files in.

use crate::catalog::identity::LibraryKey;
use crate::catalog::index::ContentIndex;
use crate::catalog::model::{ContentLibrary, load_library_from_path};
use crate::schema_loader::{MANIFEST_SCHEMA, validate_document};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize)]
struct Manifest {
    libraries: Vec<PathBuf>,
}

#[derive(Debug, Default)]
/// In-memory list of libraries in catalog order.
pub struct LibraryRepository {
    libraries: Vec<ContentLibrary>,
}

impl LibraryRepository {
    /// Load every library named by a manifest, resolving paths relative to it.
    pub fn load_manifest(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let value: Value = serde_json::from_str(&data)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        validate_document(&MANIFEST_SCHEMA, &value)
            .with_context(|| format!("validating manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_value(value)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let mut repository = Self::default();
        for relative in &manifest.libraries {
            let library_path = base.join(relative);
            repository.register(load_library_from_path(&library_path)?);
        }
        info!(
            manifest = %path.display(),
            libraries = repository.libraries.len(),
            "content manifest loaded"
        );
        Ok(repository)
    }

    /// Append a library after the ones already registered.
    pub fn register(&mut self, library: ContentLibrary) {
        self.libraries.push(library);
    }

    /// Fetch a library by key; the first registration wins on repeated keys.
    pub fn get(&self, key: &LibraryKey) -> Option<&ContentLibrary> {
        self.libraries.iter().find(|library| &library.library == key)
    }

    pub fn libraries(&self) -> &[ContentLibrary] {
        &self.libraries
    }

    /// Flatten the registered libraries into a lookup index.
    pub fn build_index(&self) -> ContentIndex {
        ContentIndex::build(&self.libraries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_json(dir: &Path, name: &str, value: Value) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, value.to_string()).expect("write fixture");
        path
    }

    #[test]
    fn manifest_order_is_catalog_order() {
        let dir = TempDir::new().expect("tempdir");
        write_json(
            dir.path(),
            "a.json",
            json!({"library": "first", "kind": "passage", "levels": [{"id": "1.0", "label": "A"}]}),
        );
        fs::create_dir(dir.path().join("nested")).expect("mkdir");
        write_json(
            &dir.path().join("nested"),
            "b.json",
            json!({"library": "second", "kind": "sound_drill", "levels": [{"id": "1.0", "label": "B"}]}),
        );
        let manifest = write_json(
            dir.path(),
            "manifest.json",
            json!({"libraries": ["a.json", "nested/b.json"]}),
        );

        let repository = LibraryRepository::load_manifest(&manifest).expect("load manifest");
        let keys: Vec<&str> = repository
            .libraries()
            .iter()
            .map(|library| library.library.0.as_str())
            .collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert!(repository.get(&LibraryKey("second".into())).is_some());

        let index = repository.build_index();
        let item = index.lookup("1.0").item().expect("found");
        assert_eq!(item.label, "A");
        assert_eq!(index.duplicates().len(), 1);
    }

    #[test]
    fn missing_library_file_names_the_path() {
        let dir = TempDir::new().expect("tempdir");
        let manifest = write_json(
            dir.path(),
            "manifest.json",
            json!({"libraries": ["missing.json"]}),
        );
        let err = LibraryRepository::load_manifest(&manifest).expect_err("missing file");
        assert!(format!("{err:#}").contains("missing.json"));
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let manifest = write_json(dir.path(), "manifest.json", json!({"libraries": []}));
        assert!(LibraryRepository::load_manifest(&manifest).is_err());
    }
}
