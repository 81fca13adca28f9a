use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".expense_core";
const DATA_DIR: &str = "data";
const EXPORT_DIR: &str = "exports";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory: `$EXPENSE_CORE_HOME`, else `~/.expense_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("EXPENSE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Directory holding the persisted collections under `base`.
pub fn data_dir_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

/// Default destination for CSV exports under `base`.
pub fn export_dir_in(base: &Path) -> PathBuf {
    base.join(EXPORT_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used to stage a write before renaming it into place.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to `path` by staging it in a temporary file and renaming it over the target.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/expenses.json")),
            PathBuf::from("/data/expenses.json.tmp")
        );
        assert_eq!(
            tmp_path(Path::new("/data/raw")),
            PathBuf::from("/data/raw.tmp")
        );
    }

    #[test]
    fn write_atomic_creates_parents_and_leaves_no_tmp() {
        let temp = tempfile::tempdir().unwrap();
        let target = temp.path().join("nested").join("out.json");
        write_atomic(&target, "[]").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
        assert!(!tmp_path(&target).exists());
    }
}
