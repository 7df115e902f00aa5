//! Item identifier → context file resolution.
//!
//! The catalog is plain data: a JSON file
//!
//! ```json
//! {
//!   "items": { "diamondpickaxe": "diamond_pickaxe.txt" },
//!   "messages": { "uncertain": "I'm not sure." }
//! }
//! ```
//!
//! or, when no file exists, the built-in five-item mapping. Context files are
//! read fresh on every request.

use std::{
    collections::BTreeMap,
    fs,
    path::{Component, Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, info};

use crate::{error::ItemQaError, postprocess::MessageOverrides};

const BUILTIN_ITEMS: [(&str, &str); 5] = [
    ("diamondpickaxe", "diamond_pickaxe.txt"),
    ("whiskyglass", "whisky_glass.txt"),
    ("veganfur", "vegan_fur.txt"),
    ("studyguide", "study_guide.txt"),
    ("lumberjackburger", "lumberjack_burger.txt"),
];

/// Name looked up in the items directory when no catalog path is configured.
pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    items: BTreeMap<String, String>,
    #[serde(default)]
    messages: MessageOverrides,
}

/// Immutable identifier → filename table rooted at an items directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCatalog {
    dir: PathBuf,
    items: BTreeMap<String, String>,
}

impl ItemCatalog {
    /// The five built-in items.
    pub fn builtin(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            items: BUILTIN_ITEMS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Builds a catalog from explicit entries. Keys are lowercased.
    ///
    /// # Errors
    /// Rejects empty identifiers and filenames that are not plain relative
    /// paths inside `dir`.
    pub fn new<I, K, V>(dir: impl Into<PathBuf>, entries: I) -> Result<Self, ItemQaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let dir = dir.into();
        let mut items = BTreeMap::new();
        for (key, file) in entries {
            let key = key.as_ref().trim().to_lowercase();
            let file = file.into();
            if key.is_empty() {
                return Err(invalid(&dir, "empty item identifier".to_string()));
            }
            if !is_plain_relative(&file) {
                return Err(invalid(
                    &dir,
                    format!("item `{key}` points outside the items directory: `{file}`"),
                ));
            }
            items.insert(key, file);
        }
        Ok(Self { dir, items })
    }

    /// Loads the catalog and message overrides.
    ///
    /// With `catalog_path = None`, `<dir>/catalog.json` is used when present
    /// and the built-in mapping otherwise. An explicit path must exist.
    ///
    /// # Errors
    /// [`ItemQaError::Catalog`] when the file cannot be read or parsed.
    pub fn load(
        dir: impl Into<PathBuf>,
        catalog_path: Option<&Path>,
    ) -> Result<(Self, MessageOverrides), ItemQaError> {
        let dir = dir.into();
        let path = match catalog_path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = dir.join(DEFAULT_CATALOG_FILE);
                if !p.exists() {
                    info!(dir = %dir.display(), "No catalog file, using built-in items");
                    return Ok((Self::builtin(dir), MessageOverrides::default()));
                }
                p
            }
        };

        let raw = fs::read_to_string(&path).map_err(|e| ItemQaError::Catalog {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let parsed: CatalogFile = serde_json::from_str(&raw).map_err(|e| ItemQaError::Catalog {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let catalog = Self::new(dir, parsed.items)?;
        info!(
            path = %path.display(),
            items = catalog.items.len(),
            "Item catalog loaded"
        );
        Ok((catalog, parsed.messages))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Known identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Filename for an identifier (case-insensitive).
    pub fn filename(&self, item_type: &str) -> Option<&str> {
        self.items
            .get(&item_type.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Reads the full context text for `item_type`.
    ///
    /// # Errors
    /// - [`ItemQaError::UnknownItem`] when the identifier is not cataloged;
    /// - [`ItemQaError::ContextUnavailable`] when the file is missing,
    ///   unreadable, not UTF-8 or blank.
    pub async fn load_context(&self, item_type: &str) -> Result<String, ItemQaError> {
        let file = self
            .filename(item_type)
            .ok_or_else(|| ItemQaError::UnknownItem(item_type.to_string()))?;
        let path = self.dir.join(file);
        debug!(item = item_type, path = %path.display(), "Reading item context");

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ItemQaError::ContextUnavailable {
                item: item_type.to_string(),
                reason: e.to_string(),
            })?;
        if text.trim().is_empty() {
            return Err(ItemQaError::ContextUnavailable {
                item: item_type.to_string(),
                reason: "context file is empty".to_string(),
            });
        }
        Ok(text)
    }
}

fn is_plain_relative(file: &str) -> bool {
    let path = Path::new(file);
    !file.trim().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn invalid(dir: &Path, reason: String) -> ItemQaError {
    ItemQaError::Catalog {
        path: dir.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn builtin_has_five_items() {
        let c = ItemCatalog::builtin("items");
        assert_eq!(c.ids().count(), 5);
        assert_eq!(c.filename("DiamondPickaxe"), Some("diamond_pickaxe.txt"));
        assert_eq!(c.filename("unknownitem"), None);
    }

    #[test]
    fn rejects_paths_leaving_the_directory() {
        for bad in ["../secret.txt", "/etc/passwd", "a/../../b.txt", "", "./x.txt"] {
            let err = ItemCatalog::new("items", [("x", bad)]).unwrap_err();
            assert!(matches!(err, ItemQaError::Catalog { .. }), "{bad}");
        }
        assert!(ItemCatalog::new("items", [("x", "nested/x.txt")]).is_ok());
    }

    #[test]
    fn keys_are_lowercased() {
        let c = ItemCatalog::new("items", [(" WhiskyGlass ", "glass.txt")]).unwrap();
        assert_eq!(c.ids().collect::<Vec<_>>(), vec!["whiskyglass"]);
    }

    #[test]
    fn load_falls_back_to_builtin_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let (c, msgs) = ItemCatalog::load(dir.path(), None).unwrap();
        assert_eq!(c, ItemCatalog::builtin(dir.path()));
        assert_eq!(msgs, MessageOverrides::default());
    }

    #[test]
    fn load_reads_items_and_messages() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CATALOG_FILE),
            r#"{"items":{"Lamp":"lamp.txt"},"messages":{"uncertain":"Hmm."}}"#,
        )
        .unwrap();
        let (c, msgs) = ItemCatalog::load(dir.path(), None).unwrap();
        assert_eq!(c.filename("lamp"), Some("lamp.txt"));
        assert_eq!(msgs.uncertain.as_deref(), Some("Hmm."));
        assert_eq!(msgs.low_confidence, None);
    }

    #[test]
    fn explicit_missing_or_malformed_catalog_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(ItemCatalog::load(dir.path(), Some(&missing)).is_err());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"items":{"a":"a.txt"},"extra":1}"#).unwrap();
        assert!(matches!(
            ItemCatalog::load(dir.path(), Some(&bad)),
            Err(ItemQaError::Catalog { .. })
        ));
    }

    #[tokio::test]
    async fn load_context_errors_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lamp.txt"), "A brass lamp.\n").unwrap();
        fs::write(dir.path().join("blank.txt"), "  \n").unwrap();
        let c = ItemCatalog::new(
            dir.path(),
            [("lamp", "lamp.txt"), ("blank", "blank.txt"), ("ghost", "ghost.txt")],
        )
        .unwrap();

        assert_eq!(c.load_context("LAMP").await.unwrap(), "A brass lamp.\n");
        for id in ["blank", "ghost", "unknownitem"] {
            let err = c.load_context(id).await.unwrap_err();
            assert!(err.is_not_found(), "{id}: {err}");
        }
    }
}
