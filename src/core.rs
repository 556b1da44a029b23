/*
 * This module consolidates the core, UI-independent logic of the application:
 * parsing the data item list, holding the catalog and the user's selection,
 * and materializing placeholder files. Collaborators with side effects are
 * abstracted behind traits (`CatalogSourceOperations`, `MaterializerOperations`,
 * `ConfigManagerOperations`, `SelectionProfileOperations`) so the session
 * logic can be tested with mocks.
 */
pub mod catalog;
pub mod config;
pub mod config_parser;
pub mod materializer;
pub mod models;
pub mod path_utils;
pub mod selection;
pub mod selection_profiles;

// Re-export key structures
pub use models::DataItem;

#[cfg(test)]
pub use config_parser::parse_str;

pub use catalog::{CatalogError, CatalogSourceOperations, CoreCatalogSource, ItemCatalog};

#[cfg(test)]
pub use catalog::LoadedCatalog;

pub use selection::SelectionSet;

pub use materializer::{
    BatchReport, CoreMaterializer, MaterializerOperations, materialize_all,
};

#[cfg(test)]
pub use materializer::MaterializeError;

pub use config::{AppSettings, ConfigManagerOperations, CoreConfigManager, DEFAULT_CATALOG_PATH};

#[cfg(test)]
pub use config::ConfigError;

pub use selection_profiles::{
    CoreSelectionProfileManager, PROFILES_SUBFOLDER_NAME, SelectionProfile,
    SelectionProfileError, SelectionProfileOperations,
};
