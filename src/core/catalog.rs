/*
 * Holds the data items read from a configuration file, keyed by name and kept
 * in lexicographic order. A catalog is only ever built whole: `load` replaces
 * every entry, and `CoreCatalogSource::load_catalog` returns a brand-new
 * catalog so callers can swap it in only after the file parsed successfully.
 *
 * The `CatalogSourceOperations` trait abstracts reading and writing catalog
 * files so the session logic can be tested with in-memory mocks.
 */
use super::config_parser::{self, ParseError};
use super::models::DataItem;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    Parse(ParseError),
    NotFound(String),
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<ParseError> for CatalogError {
    fn from(err: ParseError) -> Self {
        CatalogError::Parse(err)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "Catalog I/O error: {e}"),
            CatalogError::Parse(e) => write!(f, "Catalog parse error: {e}"),
            CatalogError::NotFound(name) => write!(f, "Data item not found: {name}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Parse(e) => Some(e),
            CatalogError::NotFound(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ItemCatalog {
    items: BTreeMap<String, DataItem>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = DataItem>) -> Self {
        let mut catalog = Self::new();
        catalog.load(entries);
        catalog
    }

    /*
     * Replaces the whole content of the catalog with `entries`. When a name
     * occurs more than once the last entry wins.
     */
    pub fn load(&mut self, entries: impl IntoIterator<Item = DataItem>) {
        self.items = entries
            .into_iter()
            .map(|item| (item.name.clone(), item))
            .collect();
    }

    pub fn get(&self, name: &str) -> Result<&DataItem> {
        self.items
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    /// Item names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataItem> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A freshly loaded catalog together with the lines that had the wrong format.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    pub catalog: ItemCatalog,
    pub rejects: Vec<String>,
}

pub trait CatalogSourceOperations: Send + Sync {
    fn load_catalog(&self, path: &Path) -> Result<LoadedCatalog>;
    fn save_catalog(&self, path: &Path, catalog: &ItemCatalog) -> Result<()>;
}

pub struct CoreCatalogSource {}

impl CoreCatalogSource {
    pub fn new() -> Self {
        CoreCatalogSource {}
    }
}

impl Default for CoreCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSourceOperations for CoreCatalogSource {
    /*
     * Reads a UTF-8 configuration file and parses it into a new catalog.
     * Nothing is returned unless the whole file parsed, so a bad file never
     * leaves a half-populated catalog behind.
     */
    fn load_catalog(&self, path: &Path) -> Result<LoadedCatalog> {
        log::trace!("CoreCatalogSource: Loading catalog from {path:?}");
        let text = fs::read_to_string(path)?;
        let parsed = config_parser::parse_str(&text)?;
        let catalog = ItemCatalog::from_entries(parsed.entries);
        log::debug!(
            "CoreCatalogSource: Loaded {} data items from {path:?} ({} rejected lines).",
            catalog.len(),
            parsed.rejects.len()
        );
        Ok(LoadedCatalog {
            catalog,
            rejects: parsed.rejects,
        })
    }

    fn save_catalog(&self, path: &Path, catalog: &ItemCatalog) -> Result<()> {
        log::trace!(
            "CoreCatalogSource: Saving {} data items to {path:?}",
            catalog.len()
        );
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        for item in catalog.iter() {
            writeln!(writer, "{}", config_parser::format_line(item))?;
        }
        writer.flush()?;
        log::debug!("CoreCatalogSource: Saved catalog to {path:?}.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_orders_names_lexicographically() {
        let mut catalog = ItemCatalog::new();
        catalog.load(vec![
            DataItem::new("B", 2.5),
            DataItem::new("A", 1.0),
            DataItem::new("C_1", 3.0),
        ]);

        assert_eq!(catalog.names(), vec!["A", "B", "C_1"]);
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_replaces_previous_contents() {
        let mut catalog = ItemCatalog::from_entries(vec![DataItem::new("OLD", 1.0)]);

        catalog.load(vec![DataItem::new("NEW", 2.0)]);

        assert!(!catalog.contains("OLD"));
        assert_eq!(catalog.names(), vec!["NEW"]);
    }

    #[test]
    fn test_duplicate_names_last_write_wins() {
        let catalog =
            ItemCatalog::from_entries(vec![DataItem::new("A", 1.0), DataItem::new("A", 4.0)]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("A").unwrap().size_mb, 4.0);
    }

    #[test]
    fn test_get_missing_name_is_not_found() {
        let catalog = ItemCatalog::new();
        match catalog.get("MISSING") {
            Err(CatalogError::NotFound(name)) => assert_eq!(name, "MISSING"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_catalog_from_file_round_trip() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("ListDataItem.cnf");
        fs::write(&path, "A:1\nB:2.5\n").unwrap();
        let source = CoreCatalogSource::new();

        // Act
        let loaded = source.load_catalog(&path).unwrap();

        // Assert
        assert_eq!(loaded.catalog.names(), vec!["A", "B"]);
        assert_eq!(loaded.catalog.get("A").unwrap().size_mb, 1.0);
        assert!(loaded.rejects.is_empty());
    }

    #[test]
    fn test_load_catalog_returns_rejects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.cnf");
        fs::write(&path, "A:1\nbroken line\nB:text\n").unwrap();

        let loaded = CoreCatalogSource::new().load_catalog(&path).unwrap();

        assert_eq!(loaded.catalog.names(), vec!["A"]);
        assert_eq!(loaded.rejects, vec!["broken line", "B:text"]);
    }

    #[test]
    fn test_load_catalog_with_byte_order_mark() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("windows.cnf");
        fs::write(&path, "\u{feff}A:1\nB:2\n").unwrap();

        let loaded = CoreCatalogSource::new().load_catalog(&path).unwrap();

        assert_eq!(loaded.catalog.names(), vec!["A", "B"]);
        assert!(loaded.catalog.contains("A"));
    }

    #[test]
    fn test_load_catalog_parse_failure_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("list.cnf");
        fs::write(&path, "A:1\nB:9x\n").unwrap();

        let result = CoreCatalogSource::new().load_catalog(&path);

        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn test_load_catalog_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = CoreCatalogSource::new().load_catalog(&dir.path().join("absent.cnf"));
        match result {
            Err(CatalogError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_save_catalog_then_load_preserves_items() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.cnf");
        let source = CoreCatalogSource::new();
        let catalog = ItemCatalog::from_entries(vec![
            DataItem::new("P4_1A_HR_____", 10.0),
            DataItem::new("P4_2B_LR_____", 0.5),
        ]);

        source.save_catalog(&path, &catalog).unwrap();
        let loaded = source.load_catalog(&path).unwrap();

        assert_eq!(loaded.catalog, catalog);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "P4_1A_HR_____:10\nP4_2B_LR_____:0.5\n"
        );
    }
}
