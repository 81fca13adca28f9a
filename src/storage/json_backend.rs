use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use std::{
    cmp::Reverse,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic},
    errors::Result,
};

use super::KeyValueStore;

const FILE_EXTENSION: &str = "json";
const BACKUP_DIR: &str = "backups";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%f";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed store: one JSON file per key under `root`, written atomically.
///
/// Before a key is overwritten the previous file is copied into `root/backups`,
/// keeping the newest `retention` snapshots per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

/// A snapshot taken before a key was overwritten.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub key: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Result<Self> {
        Self::with_retention(root, DEFAULT_RETENTION)
    }

    pub fn with_retention(root: PathBuf, retention: usize) -> Result<Self> {
        let backups_dir = root.join(BACKUP_DIR);
        ensure_dir(&root)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.max(1),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn key_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), FILE_EXTENSION))
    }

    /// Snapshots for `key`, newest first.
    pub fn list_backups(&self, key: &str) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_key(key);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some((owner, created_at)) = parse_backup_name(name) else {
                continue;
            };
            if owner != slug {
                continue;
            }
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                key: slug.clone(),
                name: name.to_string(),
                created_at,
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse(info.created_at));
        Ok(entries)
    }

    fn backup_existing_file(&self, key: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backups_dir)?;
        let slug = canonical_key(key);
        let mut stamp = Utc::now();
        let mut target = self.backup_path(&slug, stamp);
        // Coarse clocks can repeat a reading; never overwrite an earlier snapshot.
        while target.exists() {
            stamp += Duration::nanoseconds(1);
            target = self.backup_path(&slug, stamp);
        }
        fs::copy(path, &target)?;
        self.prune_backups(key)
    }

    fn backup_path(&self, slug: &str, stamp: DateTime<Utc>) -> PathBuf {
        self.backups_dir.join(format!(
            "{}_{}.{}",
            slug,
            stamp.format(BACKUP_TIMESTAMP_FORMAT),
            FILE_EXTENSION
        ))
    }

    fn prune_backups(&self, key: &str) -> Result<()> {
        for stale in self.list_backups(key)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&stale.path) {
                tracing::warn!(path = %stale.path.display(), %err, "failed to prune snapshot");
            }
        }
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        self.backup_existing_file(key, &path)?;
        write_atomic(&path, value)?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "collection written");
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

fn canonical_key(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "collection".into()
    } else {
        sanitized
    }
}

/// Splits a snapshot file name `<key>_YYYYmmdd_HHMMSS_<nanos>.json` into its key
/// and stamp. Names without the nanosecond segment are still recognised.
fn parse_backup_name(name: &str) -> Option<(&str, DateTime<Utc>)> {
    let stem = name.strip_suffix(&format!(".{FILE_EXTENSION}"))?;
    let (rest, nanos) = match stem.rsplit_once('_') {
        Some((rest, frac)) if is_digits(frac, 9) => (rest, frac.parse::<i64>().ok()?),
        _ => (stem, 0),
    };
    let mut segments = rest.rsplitn(3, '_');
    let time = segments.next()?;
    let date = segments.next()?;
    let key = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 6) {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| {
            let stamp = DateTime::from_naive_utc_and_offset(naive, Utc);
            (key, stamp + Duration::nanoseconds(nanos))
        })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
