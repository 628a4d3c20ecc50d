use crate::error::{Result, StoreError};
use crate::models::Student;
use crate::storage::{self, LoadStatus};
use crate::utils::non_blank;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// The roster kept in memory and mirrored to one JSON file.
///
/// Every successful mutation rewrites the whole file. A failed write is
/// logged and leaves memory ahead of disk until the next save succeeds.
pub struct StudentManager {
    path: PathBuf,
    students: Vec<Student>,
    load_status: LoadStatus,
    synced: bool,
    last_save_error: Option<String>,
}

impl StudentManager {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let (students, load_status) = storage::load_all(&path)?;
        match &load_status {
            LoadStatus::Loaded { count } => info!(count, path = %path.display(), "loaded students"),
            LoadStatus::Fresh => warn!(path = %path.display(), "no existing file, starting fresh"),
            LoadStatus::Corrupt { reason, backup } => warn!(
                path = %path.display(),
                reason = %reason,
                backup = ?backup,
                "roster file is not valid JSON, starting with empty records"
            ),
        }
        let synced = !matches!(load_status, LoadStatus::Corrupt { .. });
        Ok(StudentManager { path, students, load_status, synced, last_save_error: None })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Whether the file on disk reflects the roster in memory.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn save(&mut self) -> Result<()> {
        match storage::save_all(&self.path, &self.students) {
            Ok(()) => {
                info!(count = self.students.len(), path = %self.path.display(), "records saved");
                self.synced = true;
                self.last_save_error = None;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, path = %self.path.display(), "error saving records");
                self.synced = false;
                self.last_save_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // Mutations succeed even when the write fails; `is_synced` carries that.
    fn persist(&mut self) {
        let _ = self.save();
    }

    /// True when no student other than `exclude_id` already uses `student_id`.
    pub fn validate_unique_id(&self, student_id: &str, exclude_id: Option<&str>) -> bool {
        !self
            .students
            .iter()
            .any(|s| s.student_id == student_id && Some(s.student_id.as_str()) != exclude_id)
    }

    pub fn add(&mut self, student_id: &str, name: &str, grade: &str) -> Result<&Student> {
        let student_id = non_blank(student_id).ok_or(StoreError::EmptyField { field: "student ID" })?;
        let name = non_blank(name).ok_or(StoreError::EmptyField { field: "name" })?;
        let grade = non_blank(grade).ok_or(StoreError::EmptyField { field: "grade" })?;
        if !self.validate_unique_id(student_id, None) {
            return Err(StoreError::DuplicateId { id: student_id.to_string() });
        }

        debug!(student_id, "adding student");
        self.students.push(Student::new(student_id, name, grade));
        self.persist();
        Ok(&self.students[self.students.len() - 1])
    }

    /// Overwrite name and/or grade; blank or missing values keep the current field.
    pub fn update(&mut self, student_id: &str, name: Option<&str>, grade: Option<&str>) -> Result<&Student> {
        let idx = self.position(student_id)?;
        let student = &mut self.students[idx];
        if let Some(name) = name.and_then(non_blank) {
            student.name = name.to_string();
        }
        if let Some(grade) = grade.and_then(non_blank) {
            student.grade = grade.to_string();
        }

        debug!(student_id, "updated student");
        self.persist();
        Ok(&self.students[idx])
    }

    pub fn delete(&mut self, student_id: &str) -> Result<Student> {
        let idx = self.position(student_id)?;
        let removed = self.students.remove(idx);

        debug!(student_id, "deleted student");
        self.persist();
        Ok(removed)
    }

    pub fn find(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    pub fn list(&self) -> &[Student] {
        &self.students
    }

    fn position(&self, student_id: &str) -> Result<usize> {
        self.students
            .iter()
            .position(|s| s.student_id == student_id)
            .ok_or_else(|| StoreError::NotFound { id: student_id.to_string() })
    }
}
