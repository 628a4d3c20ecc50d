use crate::error::{Result, StoreError};
use crate::models::Student;
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_FILE: &str = "students.json";

/// What `load_all` found on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loaded { count: usize },
    Fresh,
    Corrupt { reason: String, backup: Option<PathBuf> },
}

/// Read the whole roster file.
///
/// A missing file or one that is not JSON at all yields an empty roster; the
/// unreadable file is first copied aside with `backup_corrupt`. JSON that does
/// not describe a list of complete records is an error.
pub fn load_all(path: &Path) -> Result<(Vec<Student>, LoadStatus)> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok((Vec::new(), LoadStatus::Fresh)),
        Err(source) => {
            return Err(StoreError::Io { operation: "read", path: path.to_path_buf(), source })
        }
    };
    let value: serde_json::Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => {
            let backup = match backup_corrupt(path) {
                Ok(p) => Some(p),
                Err(err) => {
                    warn!(error = %err, "could not keep a copy of the unreadable roster file");
                    None
                }
            };
            return Ok((Vec::new(), LoadStatus::Corrupt { reason: e.to_string(), backup }));
        }
    };
    let records: Vec<Student> = serde_json::from_value(value)
        .map_err(|source| StoreError::Schema { path: path.to_path_buf(), source })?;
    let count = records.len();
    Ok((records, LoadStatus::Loaded { count }))
}

/// Overwrite `path` with the full roster, pretty-printed.
pub fn save_all(path: &Path, records: &[Student]) -> Result<()> {
    let s = serde_json::to_string_pretty(records)?;
    fs::write(path, s)
        .map_err(|source| StoreError::Io { operation: "write", path: path.to_path_buf(), source })?;
    Ok(())
}

/// Copy an unreadable roster file aside so the next save does not destroy it.
///
/// The first copy is `<path>.corrupt`; later ones get `.1`, `.2`, ... so an
/// earlier backup is never overwritten.
pub fn backup_corrupt(path: &Path) -> Result<PathBuf> {
    let backup = next_backup_path(path);
    fs::copy(path, &backup)
        .map_err(|source| StoreError::Io { operation: "back up", path: path.to_path_buf(), source })?;
    Ok(backup)
}

fn next_backup_path(path: &Path) -> PathBuf {
    let mut base = OsString::from(path.as_os_str());
    base.push(".corrupt");
    let mut candidate = PathBuf::from(&base);
    let mut n = 1u32;
    while candidate.exists() {
        let mut name = base.clone();
        name.push(format!(".{n}"));
        candidate = PathBuf::from(name);
        n += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_starts_fresh() {
        let dir = tempdir().unwrap();
        let (records, status) = load_all(&dir.path().join("none.json")).unwrap();
        assert!(records.is_empty());
        assert_eq!(status, LoadStatus::Fresh);
    }

    #[test]
    fn save_then_load_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        let roster = vec![
            Student::new("S2", "Alan Turing", "B"),
            Student::new("S1", "Ada Lovelace", "A"),
        ];
        save_all(&path, &roster).unwrap();

        let (loaded, status) = load_all(&path).unwrap();
        assert_eq!(loaded, roster);
        assert_eq!(status, LoadStatus::Loaded { count: 2 });
    }

    #[test]
    fn writes_two_space_indented_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        save_all(&path, &[Student::new("S1", "Ada", "A")]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {\n    \"student_id\": \"S1\""));
    }

    #[test]
    fn invalid_json_is_corrupt_not_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, "[{\"student_id\": ").unwrap();

        let (records, status) = load_all(&path).unwrap();
        assert!(records.is_empty());
        match status {
            LoadStatus::Corrupt { backup, .. } => {
                assert_eq!(backup, Some(dir.path().join("students.json.corrupt")));
            }
            other => panic!("expected corrupt status, got {other:?}"),
        }
    }

    #[test]
    fn non_utf8_bytes_are_corrupt_not_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x41]).unwrap();

        let (records, status) = load_all(&path).unwrap();
        assert!(records.is_empty());
        assert!(matches!(status, LoadStatus::Corrupt { backup: Some(_), .. }));
    }

    #[test]
    fn record_missing_key_is_schema_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, r#"[{"student_id": "S1", "name": "Ada"}]"#).unwrap();

        let err = load_all(&path).unwrap_err();
        assert!(matches!(err, StoreError::Schema { .. }));
    }

    #[test]
    fn backup_sits_next_to_original() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");
        fs::write(&path, "not json").unwrap();

        let backup = backup_corrupt(&path).unwrap();
        assert_eq!(backup, dir.path().join("students.json.corrupt"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "not json");
    }

    #[test]
    fn repeated_backups_keep_earlier_copies() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("students.json");

        fs::write(&path, "first garbage").unwrap();
        let first = backup_corrupt(&path).unwrap();
        fs::write(&path, "second garbage").unwrap();
        let second = backup_corrupt(&path).unwrap();

        assert_eq!(second, dir.path().join("students.json.corrupt.1"));
        assert_eq!(fs::read_to_string(first).unwrap(), "first garbage");
        assert_eq!(fs::read_to_string(second).unwrap(), "second garbage");
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope").join("students.json");
        let err = save_all(&path, &[]).unwrap_err();
        assert!(matches!(err, StoreError::Io { operation: "write", .. }));
    }
}
