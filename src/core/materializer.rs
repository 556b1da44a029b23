/*
 * Turns selected data items into placeholder files. Each file is created (or
 * truncated) inside an existing target directory and resized to the item's
 * exact byte length; no content is written, so on most filesystems the result
 * is sparse.
 *
 * Batches never abort: every item is attempted, and each failure is logged
 * and reported individually in the returned `BatchReport`. Files created
 * earlier in a batch are left in place when a later one fails.
 */
use super::catalog::ItemCatalog;
use super::models::DataItem;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

// Characters that cannot appear in a portable file name.
const RESERVED_NAME_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

#[derive(Debug)]
pub enum MaterializeError {
    InvalidName(String),
    NotFound(String),
    Io { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaterializeError::InvalidName(name) => {
                write!(f, "Invalid data item name for a file: {name:?}")
            }
            MaterializeError::NotFound(name) => write!(f, "Data item not found: {name}"),
            MaterializeError::Io { path, source } => {
                write!(f, "I/O error for {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for MaterializeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MaterializeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MaterializeError>;

/*
 * Makes sure an item name can be used verbatim as a single file name inside
 * the target directory, without escaping it.
 */
pub fn validate_item_name(name: &str) -> Result<()> {
    let is_invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name
            .chars()
            .any(|c| c.is_control() || RESERVED_NAME_CHARS.contains(&c));
    if is_invalid {
        return Err(MaterializeError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub trait MaterializerOperations: Send + Sync {
    fn materialize(&self, item: &DataItem, target_dir: &Path) -> Result<PathBuf>;
}

pub struct CoreMaterializer {}

impl CoreMaterializer {
    pub fn new() -> Self {
        CoreMaterializer {}
    }
}

impl Default for CoreMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterializerOperations for CoreMaterializer {
    fn materialize(&self, item: &DataItem, target_dir: &Path) -> Result<PathBuf> {
        validate_item_name(&item.name)?;
        if !target_dir.is_dir() {
            return Err(MaterializeError::Io {
                path: target_dir.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    "target directory does not exist",
                ),
            });
        }

        let path = target_dir.join(&item.name);
        let byte_len = item.byte_len();
        log::trace!("CoreMaterializer: Creating {path:?} with {byte_len} bytes");
        let to_io_error = |source: io::Error| MaterializeError::Io {
            path: path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(to_io_error)?;
        file.set_len(byte_len).map_err(to_io_error)?;
        log::debug!(
            "CoreMaterializer: Created '{}' ({} MB) at {path:?}.",
            item.name,
            item.size_mb
        );
        Ok(path)
    }
}

#[derive(Debug)]
pub struct MaterializationOutcome {
    pub name: String,
    pub byte_len: u64,
    pub result: Result<PathBuf>,
}

/// Per-item results of one batch, in the order the items were requested.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<MaterializationOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &MaterializationOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &MaterializationOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn total_bytes(&self) -> u64 {
        self.succeeded().map(|o| o.byte_len).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }
}

/*
 * Materializes every named item in order. Names missing from the catalog and
 * failing writes are recorded and the loop moves on to the next name.
 */
pub fn materialize_all<S: AsRef<str>>(
    names: &[S],
    catalog: &ItemCatalog,
    target_dir: &Path,
    materializer: &dyn MaterializerOperations,
) -> BatchReport {
    log::info!(
        "Materializer: Generating {} data items in {target_dir:?}",
        names.len()
    );
    let mut report = BatchReport::default();
    for name in names {
        let name = name.as_ref();
        let (byte_len, result) = match catalog.get(name) {
            Ok(item) => (item.byte_len(), materializer.materialize(item, target_dir)),
            Err(_) => (0, Err(MaterializeError::NotFound(name.to_string()))),
        };
        if let Err(e) = &result {
            log::error!("Materializer: Failed to generate '{name}': {e}");
        }
        report.outcomes.push(MaterializationOutcome {
            name: name.to_string(),
            byte_len,
            result,
        });
    }
    log::info!(
        "Materializer: {} of {} data items generated.",
        report.succeeded().count(),
        report.outcomes.len()
    );
    report
}
