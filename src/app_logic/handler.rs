use crate::core::{
    AppSettings, BatchReport, CatalogError, CatalogSourceOperations, ConfigManagerOperations,
    DEFAULT_CATALOG_PATH, ItemCatalog, MaterializerOperations, SelectionProfile,
    SelectionProfileError, SelectionProfileOperations, SelectionSet, materialize_all,
};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub(crate) const APP_NAME_FOR_SETTINGS: &str = "DataGenerator";

/// What a successful catalog load reports back to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSummary {
    pub path: PathBuf,
    pub item_count: usize,
    pub rejects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestoreSummary {
    pub restored: Vec<String>,
    pub missing: Vec<String>,
}

/*
 * Owns the state of one working session: the loaded catalog, the user's
 * selection and the names currently marked for removal. Every driver (CLI,
 * interactive shell, or a UI) works through this type instead of shared
 * globals. Side effects go through injected `...Operations` collaborators.
 */
pub struct DataGeneratorLogic {
    pub(crate) catalog: ItemCatalog,
    pub(crate) catalog_path: Option<PathBuf>,
    pub(crate) selection: SelectionSet,
    pub(crate) marked_for_removal: IndexSet<String>,
    pub(crate) settings: AppSettings,
    remember_catalog_path: bool,
    catalog_source: Arc<dyn CatalogSourceOperations>,
    materializer: Arc<dyn MaterializerOperations>,
    config_manager: Arc<dyn ConfigManagerOperations>,
    profile_manager: Arc<dyn SelectionProfileOperations>,
}

impl DataGeneratorLogic {
    /*
     * Creates a session with an empty catalog. Stored settings are read once
     * here; a failure to read them is logged and the defaults are used.
     */
    pub fn new(
        catalog_source: Arc<dyn CatalogSourceOperations>,
        materializer: Arc<dyn MaterializerOperations>,
        config_manager: Arc<dyn ConfigManagerOperations>,
        profile_manager: Arc<dyn SelectionProfileOperations>,
    ) -> Self {
        let settings = match config_manager.load_settings(APP_NAME_FOR_SETTINGS) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("AppLogic: Could not load settings, using defaults: {e}");
                AppSettings::default()
            }
        };
        DataGeneratorLogic {
            catalog: ItemCatalog::new(),
            catalog_path: None,
            selection: SelectionSet::new(),
            marked_for_removal: IndexSet::new(),
            settings,
            remember_catalog_path: true,
            catalog_source,
            materializer,
            config_manager,
            profile_manager,
        }
    }

    /// Read-only drivers turn this off so inspecting a list does not replace the remembered one.
    pub fn set_remember_catalog_path(&mut self, remember: bool) {
        self.remember_catalog_path = remember;
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog_path.as_deref()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn marked_for_removal(&self) -> Vec<String> {
        self.marked_for_removal.iter().cloned().collect()
    }

    pub fn last_target_dir(&self) -> Option<&Path> {
        self.settings.last_target_dir.as_deref()
    }

    /// The catalog to open on start: the last one loaded, or the bundled default.
    pub fn initial_catalog_path(&self) -> PathBuf {
        self.settings
            .last_catalog_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH))
    }

    fn persist_settings(&self) {
        if let Err(e) = self
            .config_manager
            .save_settings(APP_NAME_FOR_SETTINGS, &self.settings)
        {
            log::warn!("AppLogic: Failed to save settings: {e}");
        }
    }

    /*
     * Loads a configuration file and swaps the new catalog in only once it
     * parsed completely. On failure the previous catalog and selection are
     * untouched. On success the selection and removal marks start over.
     */
    pub fn load_catalog(&mut self, path: &Path) -> Result<LoadSummary, CatalogError> {
        log::info!("AppLogic: Loading data item list from {path:?}");
        let loaded = self.catalog_source.load_catalog(path).map_err(|e| {
            log::error!("AppLogic: Failed to load {path:?}, keeping previous catalog: {e}");
            e
        })?;

        if !loaded.rejects.is_empty() {
            log::warn!(
                "AppLogic: {} lines in {path:?} have the wrong format.",
                loaded.rejects.len()
            );
        }

        self.catalog = loaded.catalog;
        self.catalog_path = Some(path.to_path_buf());
        self.selection.clear();
        self.marked_for_removal.clear();

        if self.remember_catalog_path {
            self.settings.last_catalog_path = Some(path.to_path_buf());
            self.persist_settings();
        }

        Ok(LoadSummary {
            path: path.to_path_buf(),
            item_count: self.catalog.len(),
            rejects: loaded.rejects,
        })
    }

    pub fn save_catalog(&self, path: &Path) -> Result<(), CatalogError> {
        self.catalog_source.save_catalog(path, &self.catalog)
    }

    /// Adds `name` to the selection. Returns `Ok(false)` if it was already selected.
    pub fn select(&mut self, name: &str) -> Result<bool, CatalogError> {
        self.catalog.get(name)?;
        Ok(self.selection.add(name, &self.catalog))
    }

    /*
     * Selects each name in order. Unknown names do not stop the others; they
     * are returned so the driver can report them.
     */
    pub fn select_names<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref();
            if let Err(e) = self.select(name) {
                log::warn!("AppLogic: {e}");
                unknown.push(name.to_string());
            }
        }
        unknown
    }

    pub fn select_all(&mut self) -> usize {
        self.selection.add_all(&self.catalog)
    }

    /// Marks a selected name for the next `remove`. Unselected names are ignored.
    pub fn mark_for_removal(&mut self, name: &str) -> bool {
        if !self.selection.contains(name) {
            log::debug!("AppLogic: '{name}' is not selected, nothing to mark.");
            return false;
        }
        self.marked_for_removal.insert(name.to_string())
    }

    pub fn clear_marks(&mut self) {
        self.marked_for_removal.clear();
    }

    /*
     * Removes the marked names if any are marked, otherwise the most recently
     * added one. Marks are consumed either way.
     */
    pub fn remove(&mut self) -> Vec<String> {
        let marked: Vec<String> = self.marked_for_removal.drain(..).collect();
        let removed = self.selection.apply_remove(marked);
        log::debug!("AppLogic: Removed {removed:?} from selection.");
        removed
    }

    pub fn cancel(&mut self) {
        self.selection.clear();
        self.marked_for_removal.clear();
    }

    /*
     * Generates one placeholder file per selected item inside `target_dir`.
     * The selection stays as it is so the same batch can be generated again.
     * The directory is only remembered once at least one file was created in it.
     */
    pub fn generate(&mut self, target_dir: &Path) -> BatchReport {
        let names = self.selection.to_ordered_list();
        let report = materialize_all(&names, &self.catalog, target_dir, &*self.materializer);

        if report.succeeded().next().is_some() {
            self.settings.last_target_dir = Some(target_dir.to_path_buf());
            self.persist_settings();
        } else {
            log::debug!("AppLogic: Nothing created in {target_dir:?}, not remembering it.");
        }
        report
    }

    pub fn save_selection(&self, profile_name: &str) -> Result<(), SelectionProfileError> {
        let profile = SelectionProfile::new(
            profile_name.to_string(),
            self.catalog_path.clone(),
            self.selection.to_ordered_list(),
        );
        self.profile_manager.save_profile(&profile)
    }

    /*
     * Replaces the selection with a saved one. Names the current catalog does
     * not know are skipped and reported.
     */
    pub fn restore_selection(
        &mut self,
        profile_name: &str,
    ) -> Result<RestoreSummary, SelectionProfileError> {
        let profile = self.profile_manager.load_profile(profile_name)?;
        self.selection.clear();
        self.marked_for_removal.clear();

        let mut summary = RestoreSummary {
            restored: Vec::new(),
            missing: Vec::new(),
        };
        for name in profile.items {
            if self.selection.add(&name, &self.catalog) {
                summary.restored.push(name);
            } else if !self.catalog.contains(&name) {
                summary.missing.push(name);
            }
        }
        if !summary.missing.is_empty() {
            log::warn!(
                "AppLogic: Selection '{profile_name}' refers to unknown data items: {:?}",
                summary.missing
            );
        }
        Ok(summary)
    }

    pub fn list_selections(&self) -> Result<Vec<String>, SelectionProfileError> {
        self.profile_manager.list_profiles()
    }
}
