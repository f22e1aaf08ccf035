use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        engine_info!("Created download directory: {}", dir.display());
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Writes `entries` as a pretty JSON object, replacing any existing file.
pub fn write_json_map(
    dir: &Path,
    filename: &str,
    entries: &BTreeMap<String, String>,
) -> Result<PathBuf, PersistError> {
    let content = serde_json::to_string_pretty(entries)?;
    let path = AtomicFileWriter::new(dir.to_path_buf()).write(filename, &content)?;
    engine_info!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(path)
}

/// Merges `entries` into the JSON object stored at `{dir}/{filename}`.
/// New values win on equal keys. An unreadable existing file is replaced.
pub fn merge_json_map(
    dir: &Path,
    filename: &str,
    entries: &BTreeMap<String, String>,
) -> Result<PathBuf, PersistError> {
    let mut merged = read_json_map(&dir.join(filename));
    merged.extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));
    write_json_map(dir, filename, &merged)
}

fn read_json_map(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(err) => {
            engine_warn!("Failed to read {}: {}", path.display(), err);
            return BTreeMap::new();
        }
    };
    match serde_json::from_str(&content) {
        Ok(map) => map,
        Err(err) => {
            engine_warn!("Ignoring unparsable {}: {}", path.display(), err);
            BTreeMap::new()
        }
    }
}
