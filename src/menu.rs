use crate::manager::StudentManager;
use crate::models::Student;
use crate::storage::LoadStatus;
use crate::utils::{non_blank, render_table, rule};
use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Choice {
    Add,
    Update,
    Delete,
    List,
    Find,
    Exit,
}

impl Choice {
    pub fn parse(s: &str) -> Option<Choice> {
        match s.trim() {
            "1" => Some(Choice::Add),
            "2" => Some(Choice::Update),
            "3" => Some(Choice::Delete),
            "4" => Some(Choice::List),
            "5" => Some(Choice::Find),
            "6" => Some(Choice::Exit),
            _ => None,
        }
    }
}

/// Status line for whatever `StudentManager::open` found on disk.
pub fn load_message(status: &LoadStatus, path: &Path) -> String {
    match status {
        LoadStatus::Loaded { count } => format!("✓ Loaded {} student(s) from {}", count, path.display()),
        LoadStatus::Fresh => "⚠ No existing file found. Starting fresh.".to_string(),
        LoadStatus::Corrupt { backup: Some(b), .. } => format!(
            "⚠ Error reading {}. Starting with empty records (unreadable copy kept at {}).",
            path.display(),
            b.display()
        ),
        LoadStatus::Corrupt { backup: None, .. } => {
            format!("⚠ Error reading {}. Starting with empty records.", path.display())
        }
    }
}

/// Status line describing the outcome of the save that follows a mutation.
pub fn save_message(manager: &StudentManager) -> String {
    match manager.last_save_error() {
        None if manager.is_synced() => format!("✓ Records saved successfully to {}", manager.path().display()),
        Some(e) => format!("✗ Error saving records: {}", e),
        None => "⚠ Records have not been written to disk yet.".to_string(),
    }
}

/// Interactive console loop over a caller-owned manager.
pub struct Menu<'a, R, W> {
    manager: &'a mut StudentManager,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(manager: &'a mut StudentManager, input: R, out: W) -> Self {
        Menu { manager, input, out }
    }

    /// Runs until the user picks Exit or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.show_menu()?;
            let Some(line) = self.prompt("Enter your choice (1-6): ")? else { break };
            match Choice::parse(&line) {
                Some(Choice::Add) => self.add()?,
                Some(Choice::Update) => self.update()?,
                Some(Choice::Delete) => self.delete()?,
                Some(Choice::List) => writeln!(self.out, "\n{}\n", render_table(self.manager.list()))?,
                Some(Choice::Find) => self.find()?,
                Some(Choice::Exit) => break,
                None => writeln!(self.out, "\n✗ Invalid choice. Please enter a number between 1 and 6.")?,
            }
        }
        writeln!(self.out, "\nThank you for using Student Management System!\nGoodbye!\n")?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<()> {
        let bar = "=".repeat(50);
        writeln!(self.out, "\n{bar}\n  STUDENT MANAGEMENT SYSTEM\n{bar}")?;
        for (n, label) in ["Add Student", "Update Student", "Delete Student", "List All Students", "Find Student", "Exit"]
            .iter()
            .enumerate()
        {
            writeln!(self.out, "{}. {}", n + 1, label)?;
        }
        writeln!(self.out, "{bar}")?;
        Ok(())
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_or_empty(&mut self, text: &str) -> Result<String> {
        Ok(self.prompt(text)?.unwrap_or_default())
    }

    fn lookup(&mut self, text: &str) -> Result<Option<(String, Student)>> {
        let id = self.prompt_or_empty(text)?;
        match self.manager.find(&id) {
            Some(s) => Ok(Some((id, s.clone()))),
            None => {
                writeln!(self.out, "✗ Error: Student with ID '{}' not found.", id)?;
                Ok(None)
            }
        }
    }

    fn add(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Add New Student ---")?;
        let id = self.prompt_or_empty("Enter Student ID: ")?;
        let name = self.prompt_or_empty("Enter Student Name: ")?;
        let grade = self.prompt_or_empty("Enter Student Grade: ")?;
        match self.manager.add(&id, &name, &grade) {
            Ok(s) => {
                let name = s.name.clone();
                writeln!(self.out, "{}", save_message(self.manager))?;
                writeln!(self.out, "✓ Student '{}' added successfully!", name)?;
            }
            Err(e) => writeln!(self.out, "✗ Error: {}", e)?,
        }
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Update Student ---")?;
        let Some((id, current)) = self.lookup("Enter Student ID to update: ")? else { return Ok(()) };
        writeln!(self.out, "Current details: {}", current)?;
        let name = self.prompt_or_empty(&format!("Enter new name (press Enter to keep '{}'): ", current.name))?;
        let grade = self.prompt_or_empty(&format!("Enter new grade (press Enter to keep '{}'): ", current.grade))?;
        match self.manager.update(&id, non_blank(&name), non_blank(&grade)) {
            Ok(_) => {
                writeln!(self.out, "{}", save_message(self.manager))?;
                writeln!(self.out, "✓ Student '{}' updated successfully!", id)?;
            }
            Err(e) => writeln!(self.out, "✗ Error: {}", e)?,
        }
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Delete Student ---")?;
        let Some((id, current)) = self.lookup("Enter Student ID to delete: ")? else { return Ok(()) };
        writeln!(self.out, "Student found: {}", current)?;
        let confirm = self.prompt_or_empty("Are you sure you want to delete this student? (yes/no): ")?;
        if !confirm.eq_ignore_ascii_case("yes") {
            writeln!(self.out, "✗ Deletion cancelled.")?;
            return Ok(());
        }
        match self.manager.delete(&id) {
            Ok(_) => {
                writeln!(self.out, "{}", save_message(self.manager))?;
                writeln!(self.out, "✓ Student '{}' deleted successfully!", id)?;
            }
            Err(e) => writeln!(self.out, "✗ Error: {}", e)?,
        }
        Ok(())
    }

    fn find(&mut self) -> Result<()> {
        writeln!(self.out, "\n--- Find Student ---")?;
        if let Some((_, student)) = self.lookup("Enter Student ID to search: ")? {
            writeln!(self.out, "\n✓ Student found:\n{}\n{}\n{}", rule('-'), student, rule('-'))?;
        }
        Ok(())
    }
}
