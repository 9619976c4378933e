use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::{BudgetError, Result};

const DEFAULT_DIR_NAME: &str = ".stage_budget";
const CONFIG_FILE: &str = "config.json";
const PROJECT_FILE: &str = "project.json";
const TMP_SUFFIX: &str = "tmp";

pub const HOME_ENV: &str = "STAGE_BUDGET_HOME";

/// Returns the application data directory, defaulting to `~/.stage_budget`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(app_data_dir)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn project_file_in(base: &Path) -> PathBuf {
    base.join(PROJECT_FILE)
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|err| {
        BudgetError::StorageWrite(format!("cannot create `{}`: {err}", path.display()))
    })
}

/// Sibling path used to stage a write before renaming it over `path`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a temporary sibling and renames it over `path`.
pub fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data).map_err(|err| write_error(&tmp, err))?;
    fs::rename(&tmp, path).map_err(|err| write_error(path, err))
}

pub fn write_error(path: &Path, err: impl std::fmt::Display) -> BudgetError {
    BudgetError::StorageWrite(format!("`{}`: {err}", path.display()))
}

pub fn read_error(path: &Path, err: impl std::fmt::Display) -> BudgetError {
    BudgetError::StorageRead(format!("`{}`: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn tmp_path_keeps_original_extension() {
        assert_eq!(
            tmp_path(Path::new("/data/ledger.csv")),
            PathBuf::from("/data/ledger.csv.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/raw")), PathBuf::from("/data/raw.tmp"));
    }

    #[test]
    fn write_atomic_replaces_contents_and_cleans_tmp() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("state.json");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp_path(&path).exists());
    }
}
