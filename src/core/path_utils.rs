/*
 * Resolves the per-user directory where the application keeps its settings
 * and saved selections, creating it on first use.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

/*
 * Retrieves the application's local (non-roaming) configuration directory,
 * e.g. `~/.config/<app_name>` on Linux or `AppData/Local/<app_name>/config`
 * on Windows. The directory is created if it does not exist yet.
 *
 * Returns `None` if no home directory can be determined or the directory
 * could not be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving local config dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if !config_path.exists() {
        if let Err(e) = fs::create_dir_all(config_path) {
            log::error!("PathUtils: Failed to create config directory {config_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created config directory: {config_path:?}");
    }
    Some(config_path.to_path_buf())
}
