use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Environment variable that points at a config directory
pub const CONFIG_DIR_ENV: &str = "MESDOC_CONFIG_DIR";

const APP_DIR_NAME: &str = "mesdoc";

// Global config directory override (for --config flag and tests)
static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Set config directory override (used by --config flag and tests)
pub fn set_config_dir_override(path: Option<PathBuf>) {
    let mut override_path = CONFIG_DIR_OVERRIDE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *override_path = path;
}

/// Get current config directory override
pub fn get_config_dir_override() -> Option<PathBuf> {
    CONFIG_DIR_OVERRIDE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Where a config directory candidate came from, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigDirSource {
    /// `--config` flag or [`set_config_dir_override`]
    Override,
    /// `MESDOC_CONFIG_DIR`
    Environment,
    /// `~/.config/mesdoc/` on Unix, `%APPDATA%\mesdoc\` on Windows
    User,
    /// `./config/`
    WorkingDir,
    /// `<exe_dir>/config/`
    Executable,
}

/// Candidate config directories in lookup order. Sources that cannot be
/// determined on this machine are left out.
pub fn config_dir_candidates() -> Vec<(ConfigDirSource, PathBuf)> {
    let exe_config = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("config")));

    [
        (ConfigDirSource::Override, get_config_dir_override()),
        (
            ConfigDirSource::Environment,
            std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from),
        ),
        (ConfigDirSource::User, get_user_config_dir().ok()),
        (
            ConfigDirSource::WorkingDir,
            std::env::current_dir().ok().map(|cwd| cwd.join("config")),
        ),
        (ConfigDirSource::Executable, exe_config),
    ]
    .into_iter()
    .filter_map(|(source, path)| path.map(|path| (source, path)))
    .collect()
}

/// First existing candidate from [`config_dir_candidates`]. When none exists
/// the user config directory is created.
pub fn find_config_directory() -> Result<PathBuf> {
    for (source, path) in config_dir_candidates() {
        if path.exists() {
            tracing::debug!("Using config directory {:?} ({:?})", path, source);
            return Ok(path);
        }
        if source == ConfigDirSource::Override {
            tracing::warn!("Config directory override does not exist: {:?}", path);
        }
    }

    let user_config = get_user_config_dir()?;
    std::fs::create_dir_all(&user_config).context("Failed to create user config directory")?;
    tracing::info!("Created config directory at: {:?}", user_config);
    Ok(user_config)
}

fn get_user_config_dir() -> Result<PathBuf> {
    let base_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine user config directory"))?;
    Ok(base_dir.join(APP_DIR_NAME))
}

/// `<config_dir>/settings.toml`
pub fn get_app_config_path() -> Result<PathBuf> {
    Ok(find_config_directory()?.join("settings.toml"))
}

/// The platform download directory, else `./Downloads`
pub fn resolve_default_download_directory() -> PathBuf {
    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok().map(|cwd| cwd.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// `<config_dir>/published`, where the published monthly reports live
pub fn resolve_default_published_directory() -> PathBuf {
    resolve_relative_to_config(Path::new("published"))
}

/// Anchor a relative path at the config directory. Absolute paths, and
/// everything when no config directory can be found, pass through unchanged.
pub fn resolve_relative_to_config(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    find_config_directory()
        .map(|config_dir| config_dir.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Daily log files go to `<config_dir>/.logs`
pub fn get_logs_dir() -> Result<PathBuf> {
    Ok(find_config_directory()?.join(".logs"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn reset_test_state() {
        set_config_dir_override(None);
        unsafe { std::env::remove_var(CONFIG_DIR_ENV) };
    }

    #[test]
    #[serial]
    fn test_get_app_config_path() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();

        set_config_dir_override(Some(config_dir.clone()));

        let path = get_app_config_path().unwrap();
        assert_eq!(path, config_dir.join("settings.toml"));

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_config_dir_override() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();

        set_config_dir_override(Some(config_dir.clone()));

        assert_eq!(find_config_directory().unwrap(), config_dir);
        assert_eq!(get_logs_dir().unwrap(), config_dir.join(".logs"));

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_config_dir_from_env_variable() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();
        fs::create_dir_all(&config_dir).unwrap();

        unsafe { std::env::set_var(CONFIG_DIR_ENV, config_dir.to_str().unwrap()) };

        assert_eq!(find_config_directory().unwrap(), config_dir);

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_resolve_relative_to_config() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let config_dir = temp_dir.path().to_path_buf();
        set_config_dir_override(Some(config_dir.clone()));

        assert_eq!(
            resolve_relative_to_config(Path::new("published")),
            config_dir.join("published")
        );
        let absolute = temp_dir.path().join("elsewhere");
        assert_eq!(resolve_relative_to_config(&absolute), absolute);

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_candidates_follow_priority_order() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        set_config_dir_override(Some(temp_dir.path().join("flag")));
        unsafe { std::env::set_var(CONFIG_DIR_ENV, temp_dir.path().join("env")) };

        let sources: Vec<ConfigDirSource> =
            config_dir_candidates().into_iter().map(|(source, _)| source).collect();

        assert_eq!(
            &sources[..2],
            &[ConfigDirSource::Override, ConfigDirSource::Environment]
        );
        assert!(sources.contains(&ConfigDirSource::WorkingDir));

        reset_test_state();
    }

    #[test]
    #[serial]
    fn test_missing_override_falls_through_to_env() {
        reset_test_state();
        let temp_dir = TempDir::new().unwrap();
        let env_dir = temp_dir.path().join("env");
        fs::create_dir_all(&env_dir).unwrap();
        set_config_dir_override(Some(temp_dir.path().join("missing")));
        unsafe { std::env::set_var(CONFIG_DIR_ENV, &env_dir) };

        assert_eq!(find_config_directory().unwrap(), env_dir);

        reset_test_state();
    }

    #[test]
    fn test_get_user_config_dir_returns_valid_path() {
        let user_dir = get_user_config_dir().unwrap();
        assert!(user_dir.ends_with("mesdoc"));
    }
}
