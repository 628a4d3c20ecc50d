use crate::manager::StudentManager;
use crate::menu::{load_message, save_message, Menu};
use crate::storage::DEFAULT_FILE;
use crate::utils::render_table;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Manage a roster of student records stored as a JSON file.
#[derive(Debug, Parser)]
#[command(name = "gradebook", version)]
pub struct CommandLine {
    /// Roster file to load and rewrite
    #[arg(long, short, env = "GRADEBOOK_FILE", default_value = DEFAULT_FILE)]
    pub file: PathBuf,

    /// Run a single operation instead of the interactive menu
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new student
    Add {
        id: String,
        name: String,
        grade: String,
    },
    /// Change the name and/or grade of an existing student
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        grade: Option<String>,
    },
    /// Remove a student
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(long, short)]
        yes: bool,
    },
    /// Show one student
    Find { id: String },
    /// Show every student
    List,
}

/// Report what was loaded, then run either one subcommand or the interactive menu.
pub fn session<R: BufRead, W: Write>(
    manager: &mut StudentManager,
    command: Option<Command>,
    input: R,
    mut out: W,
) -> Result<bool> {
    writeln!(out, "{}", load_message(manager.load_status(), manager.path()))?;
    match command {
        Some(command) => execute(manager, command, &mut out),
        None => {
            Menu::new(manager, input, out).run()?;
            Ok(true)
        }
    }
}

/// Run one subcommand against `manager`. Returns whether the operation succeeded.
pub fn execute<W: Write>(manager: &mut StudentManager, command: Command, out: &mut W) -> Result<bool> {
    let outcome = match command {
        Command::Add { id, name, grade } => manager.add(&id, &name, &grade).map(|s| format!("✓ Student '{}' added successfully!", s.name)),
        Command::Update { id, name, grade } => manager
            .update(&id, name.as_deref(), grade.as_deref())
            .map(|_| format!("✓ Student '{}' updated successfully!", id)),
        Command::Delete { id, yes: false } => {
            writeln!(out, "✗ Refusing to delete '{}' without --yes.", id)?;
            return Ok(false);
        }
        Command::Delete { id, yes: true } => manager.delete(&id).map(|_| format!("✓ Student '{}' deleted successfully!", id)),
        Command::Find { id } => {
            return match manager.find(&id) {
                Some(s) => {
                    writeln!(out, "{}", s)?;
                    Ok(true)
                }
                None => {
                    writeln!(out, "✗ Error: Student with ID '{}' not found.", id)?;
                    Ok(false)
                }
            };
        }
        Command::List => {
            writeln!(out, "{}", render_table(manager.list()))?;
            return Ok(true);
        }
    };

    match outcome {
        Ok(msg) => {
            writeln!(out, "{}", save_message(manager))?;
            writeln!(out, "{}", msg)?;
            Ok(manager.is_synced())
        }
        Err(e) => {
            writeln!(out, "✗ Error: {}", e)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run(manager: &mut StudentManager, args: &[&str]) -> (bool, String) {
        let cli = CommandLine::try_parse_from(std::iter::once("gradebook").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        let ok = execute(manager, cli.command.unwrap(), &mut out).unwrap();
        (ok, String::from_utf8(out).unwrap())
    }

    #[test]
    fn verify_cli() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn file_option_overrides_default() {
        let cli = CommandLine::try_parse_from(["gradebook", "--file", "roster.json", "list"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("roster.json"));
        assert!(matches!(cli.command, Some(Command::List)));
    }

    #[test]
    fn one_shot_operations() {
        let dir = tempdir().unwrap();
        let mut manager = StudentManager::open(dir.path().join("students.json")).unwrap();

        let (ok, out) = run(&mut manager, &["add", "S1", "Ada", "A"]);
        assert!(ok);
        assert!(out.contains("added successfully"));

        let (ok, _) = run(&mut manager, &["add", "S1", "Bob", "B"]);
        assert!(!ok);

        let (ok, _) = run(&mut manager, &["update", "S1", "--grade", "A+"]);
        assert!(ok);
        let (ok, out) = run(&mut manager, &["find", "S1"]);
        assert!(ok);
        assert!(out.contains("Grade: A+"));

        let (ok, out) = run(&mut manager, &["delete", "S1"]);
        assert!(!ok);
        assert!(out.contains("--yes"));
        assert_eq!(manager.len(), 1);

        let (ok, _) = run(&mut manager, &["delete", "S1", "--yes"]);
        assert!(ok);
        let (ok, _) = run(&mut manager, &["find", "S1"]);
        assert!(!ok);
        let (ok, out) = run(&mut manager, &["list"]);
        assert!(ok);
        assert!(out.contains("No students found"));
    }

    #[test]
    fn one_shot_reports_load_status_first() {
        let dir = tempdir().unwrap();
        let mut manager = StudentManager::open(dir.path().join("students.json")).unwrap();
        manager.add("S1", "Ada", "A").unwrap();
        let mut manager = StudentManager::open(manager.path()).unwrap();

        let mut out = Vec::new();
        let ok = session(&mut manager, Some(Command::List), Cursor::new(""), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(ok);
        assert!(out.starts_with("✓ Loaded 1 student(s) from"));
        assert!(out.contains("Total Students: 1"));
    }

    #[test]
    fn no_command_runs_menu() {
        let dir = tempdir().unwrap();
        let mut manager = StudentManager::open(dir.path().join("students.json")).unwrap();

        let mut out = Vec::new();
        let ok = session(&mut manager, None, Cursor::new("6\n"), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(ok);
        assert!(out.starts_with("⚠ No existing file found. Starting fresh."));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn failed_save_reports_error_and_fails() {
        let dir = tempdir().unwrap();
        let mut manager = StudentManager::open(dir.path().join("missing").join("students.json")).unwrap();

        let (ok, out) = run(&mut manager, &["add", "S1", "Ada", "A"]);
        assert!(!ok);
        assert!(out.contains("✗ Error saving records"));
        assert_eq!(manager.len(), 1);
    }
}
