use serde::{Serialize, Deserialize};
use std::fmt;

/// One student on the roster. Lookups compare `student_id` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub grade: String,
}

impl Student {
    pub fn new(student_id: impl Into<String>, name: impl Into<String>, grade: impl Into<String>) -> Self {
        Student {
            student_id: student_id.into(),
            name: name.into(),
            grade: grade.into(),
        }
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {:<10} | Name: {:<25} | Grade: {}", self.student_id, self.name, self.grade)
    }
}
