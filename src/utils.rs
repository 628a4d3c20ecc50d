use crate::models::Student;
use std::fmt;

const TABLE_WIDTH: usize = 70;

/// Trimmed view of `s`, or `None` when nothing but whitespace is left.
pub fn non_blank(s: &str) -> Option<&str> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t) }
}

pub fn rule(c: char) -> String {
    c.to_string().repeat(TABLE_WIDTH)
}

/// The boxed report shown by "List All Students".
pub struct Roster<'a>(pub &'a [Student]);

impl fmt::Display for Roster<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No students found in the system.");
        }
        writeln!(f, "{}", rule('='))?;
        writeln!(f, "{:^width$}", "STUDENT RECORDS", width = TABLE_WIDTH)?;
        writeln!(f, "{}", rule('='))?;
        writeln!(f, "{:<10} | {:<25} | {}", "ID", "Name", "Grade")?;
        writeln!(f, "{}", rule('-'))?;
        for s in self.0 {
            writeln!(f, "{}", s)?;
        }
        writeln!(f, "{}", rule('='))?;
        write!(f, "Total Students: {}", self.0.len())
    }
}

pub fn render_table(students: &[Student]) -> String {
    Roster(students).to_string()
}
