/*
 * Saves and restores named selections so a frequently generated set of data
 * items does not have to be picked again by hand. Each profile is a small JSON
 * file in a storage directory (by default a `selections` folder inside the
 * per-user configuration directory).
 *
 * Names are sanitized into file names, so "Nightly Set" and "NightlySet"
 * share a file; saving one while the other is stored is refused.
 *
 * `SelectionProfileOperations` abstracts the storage for testing;
 * `CoreSelectionProfileManager` is the file-backed implementation.
 */
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

pub const PROFILE_FILE_EXTENSION: &str = "json";
pub const PROFILES_SUBFOLDER_NAME: &str = "selections";

#[derive(Debug)]
pub enum SelectionProfileError {
    Io(io::Error),
    Serde(serde_json::Error),
    ProfileNotFound(String),
    InvalidProfileName(String),
    NameCollision { requested: String, existing: String },
}

impl From<io::Error> for SelectionProfileError {
    fn from(err: io::Error) -> Self {
        SelectionProfileError::Io(err)
    }
}

impl From<serde_json::Error> for SelectionProfileError {
    fn from(err: serde_json::Error) -> Self {
        SelectionProfileError::Serde(err)
    }
}

impl std::fmt::Display for SelectionProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionProfileError::Io(e) => write!(f, "I/O error: {e}"),
            SelectionProfileError::Serde(e) => {
                write!(f, "Serialization/Deserialization error: {e}")
            }
            SelectionProfileError::ProfileNotFound(name) => {
                write!(f, "Selection profile not found: {name}")
            }
            SelectionProfileError::InvalidProfileName(name) => write!(
                f,
                "Invalid selection profile name: {name:?}. Contains invalid characters or is empty."
            ),
            SelectionProfileError::NameCollision {
                requested,
                existing,
            } => write!(
                f,
                "Selection profile name {requested:?} clashes with the stored profile {existing:?}"
            ),
        }
    }
}

impl std::error::Error for SelectionProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectionProfileError::Io(e) => Some(e),
            SelectionProfileError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SelectionProfileError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionProfile {
    pub name: String,
    pub catalog_path: Option<PathBuf>,
    pub items: Vec<String>,
}

impl SelectionProfile {
    pub fn new(name: String, catalog_path: Option<PathBuf>, items: Vec<String>) -> Self {
        SelectionProfile {
            name,
            catalog_path,
            items,
        }
    }
}

pub fn is_valid_profile_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ' '
}

pub fn is_valid_profile_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().all(is_valid_profile_name_char)
}

// Spaces are allowed in profile names but not in file names.
pub fn sanitize_profile_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

pub trait SelectionProfileOperations: Send + Sync {
    fn save_profile(&self, profile: &SelectionProfile) -> Result<()>;
    fn load_profile(&self, profile_name: &str) -> Result<SelectionProfile>;
    fn list_profiles(&self) -> Result<Vec<String>>;
}

pub struct CoreSelectionProfileManager {
    storage_dir: PathBuf,
}

impl CoreSelectionProfileManager {
    pub fn new(storage_dir: PathBuf) -> Self {
        CoreSelectionProfileManager { storage_dir }
    }

    fn profile_file_path(&self, profile_name: &str) -> Result<PathBuf> {
        if !is_valid_profile_name(profile_name) {
            return Err(SelectionProfileError::InvalidProfileName(
                profile_name.to_string(),
            ));
        }
        let sanitized = sanitize_profile_name(profile_name);
        Ok(self
            .storage_dir
            .join(format!("{sanitized}.{PROFILE_FILE_EXTENSION}")))
    }

    fn read_profile(path: &Path) -> Result<SelectionProfile> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl SelectionProfileOperations for CoreSelectionProfileManager {
    fn save_profile(&self, profile: &SelectionProfile) -> Result<()> {
        log::trace!(
            "CoreSelectionProfileManager: Saving profile '{}' ({} items)",
            profile.name,
            profile.items.len()
        );
        let file_path = self.profile_file_path(&profile.name)?;
        if file_path.exists() {
            match Self::read_profile(&file_path) {
                Ok(existing) if existing.name != profile.name => {
                    return Err(SelectionProfileError::NameCollision {
                        requested: profile.name.clone(),
                        existing: existing.name,
                    });
                }
                Ok(_) => {}
                Err(e) => log::warn!(
                    "CoreSelectionProfileManager: Overwriting unreadable {file_path:?}: {e}"
                ),
            }
        }
        fs::create_dir_all(&self.storage_dir)?;
        let writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(writer, profile)?;
        log::debug!(
            "CoreSelectionProfileManager: Saved profile '{}' to {file_path:?}.",
            profile.name
        );
        Ok(())
    }

    fn load_profile(&self, profile_name: &str) -> Result<SelectionProfile> {
        log::trace!("CoreSelectionProfileManager: Loading profile '{profile_name}'");
        let file_path = self.profile_file_path(profile_name)?;
        if !file_path.exists() {
            log::debug!("CoreSelectionProfileManager: Profile file {file_path:?} not found.");
            return Err(SelectionProfileError::ProfileNotFound(
                profile_name.to_string(),
            ));
        }
        let profile = Self::read_profile(&file_path)?;
        log::debug!(
            "CoreSelectionProfileManager: Loaded profile '{}' from {file_path:?}.",
            profile.name
        );
        Ok(profile)
    }

    /*
     * Lists the names stored inside the profile files (not the sanitized file
     * stems), sorted. Unreadable files are skipped with a warning.
     */
    fn list_profiles(&self) -> Result<Vec<String>> {
        if !self.storage_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.storage_dir)? {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(PROFILE_FILE_EXTENSION)
            {
                continue;
            }
            match Self::read_profile(&path) {
                Ok(profile) => names.push(profile.name),
                Err(e) => {
                    log::warn!("CoreSelectionProfileManager: Skipping unreadable {path:?}: {e}")
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_profile(name: &str) -> SelectionProfile {
        SelectionProfile::new(
            name.to_string(),
            Some(PathBuf::from("/cfg/ListDataItem.cnf")),
            vec!["P4_1A_HR_____".to_string(), "A".to_string()],
        )
    }

    #[test]
    fn test_save_and_load_profile() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().join(PROFILES_SUBFOLDER_NAME));
        let profile = sample_profile("Nightly Set");

        manager.save_profile(&profile).unwrap();
        let loaded = manager.load_profile("Nightly Set").unwrap();

        assert_eq!(loaded, profile);
        assert!(
            dir.path()
                .join(PROFILES_SUBFOLDER_NAME)
                .join("NightlySet.json")
                .exists()
        );
    }

    #[test]
    fn test_save_refuses_names_sharing_a_file() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().to_path_buf());
        manager.save_profile(&sample_profile("Nightly Set")).unwrap();

        let result = manager.save_profile(&sample_profile("NightlySet"));

        match result {
            Err(SelectionProfileError::NameCollision {
                requested,
                existing,
            }) => {
                assert_eq!(requested, "NightlySet");
                assert_eq!(existing, "Nightly Set");
            }
            other => panic!("Expected NameCollision, got {other:?}"),
        }
        assert_eq!(
            manager.load_profile("Nightly Set").unwrap().name,
            "Nightly Set"
        );
    }

    #[test]
    fn test_save_same_name_overwrites() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().to_path_buf());
        manager.save_profile(&sample_profile("daily")).unwrap();
        let updated = SelectionProfile::new("daily".to_string(), None, vec!["B".to_string()]);

        manager.save_profile(&updated).unwrap();

        assert_eq!(manager.load_profile("daily").unwrap(), updated);
    }

    #[test]
    fn test_load_missing_profile_is_not_found() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().to_path_buf());

        match manager.load_profile("absent") {
            Err(SelectionProfileError::ProfileNotFound(name)) => assert_eq!(name, "absent"),
            other => panic!("Expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_profile_names_are_rejected() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().to_path_buf());

        for name in ["", "   ", "../evil", "a/b", "semi;colon"] {
            assert!(
                matches!(
                    manager.save_profile(&sample_profile(name)),
                    Err(SelectionProfileError::InvalidProfileName(_))
                ),
                "Name {name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_list_profiles_sorted_and_skips_garbage() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().to_path_buf());
        manager.save_profile(&sample_profile("zeta")).unwrap();
        manager.save_profile(&sample_profile("alpha")).unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let names = manager.list_profiles().unwrap();

        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_list_profiles_without_storage_dir_is_empty() {
        let dir = tempdir().unwrap();
        let manager = CoreSelectionProfileManager::new(dir.path().join("never_created"));
        assert!(manager.list_profiles().unwrap().is_empty());
    }
}
