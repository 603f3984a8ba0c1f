//! This module provides the `DefinitionLoader` struct, responsible for
//! loading automaton definitions from files and strings. `.aut` files use the
//! pest DSL; `.json` files use the definition document format.

use crate::definition::Definition;
use crate::parser::parse;
use crate::types::{Automaton, AutomatonError};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads automaton definitions from individual files, from string content,
/// and from directories containing `.aut`/`.json` definitions.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads a single automaton from the given path. The file extension
    /// selects the format: `.json` uses the definition document, anything
    /// else the `.aut` DSL.
    pub fn load(path: &Path) -> Result<Automaton, AutomatonError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_string(&content)
        }
    }

    /// Parses an automaton from `.aut` DSL content.
    pub fn from_string(content: &str) -> Result<Automaton, AutomatonError> {
        parse(content)
    }

    /// Compiles an automaton from a JSON definition document.
    pub fn from_json(content: &str) -> Result<Automaton, AutomatonError> {
        Definition::from_json(content)?.compile()
    }

    /// Loads all definition files (`.aut` or `.json`) from a directory.
    /// Other files and subdirectories are skipped; each definition loads
    /// independently so one bad file does not hide the rest.
    pub fn load_all(directory: &Path) -> Vec<Result<(PathBuf, Automaton), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and unrelated files
                if path.is_dir()
                    || path
                        .extension()
                        .is_none_or(|ext| ext != "aut" && ext != "json")
                {
                    return None;
                }

                match Self::load(&path) {
                    Ok(automaton) => Some(Ok((path, automaton))),
                    Err(e) => Some(Err(AutomatonError::FileError(format!(
                        "Failed to load definition from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Formalism;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const FA_DEFINITION: &str = "name: Loader Test\ntype: fa\ninput: a\nstates:\n  q0: initial\n  q1: final\nrules:\n  q0:\n    a -> q1";

    #[test]
    fn test_load_aut_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.aut");

        let mut file = File::create(&path).unwrap();
        file.write_all(FA_DEFINITION.as_bytes()).unwrap();

        let automaton = DefinitionLoader::load(&path).unwrap();
        assert_eq!(automaton.name, "Loader Test");
        assert_eq!(automaton.formalism, Formalism::Fa);
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.json");

        let json = r#"{
            "type": "fa",
            "name": "Json Test",
            "states": [
                { "name": "q0", "initial": true },
                { "name": "q1", "final": true }
            ],
            "transitions": [{ "from": "q0", "to": "q1", "label": "a" }],
            "input": "a"
        }"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let automaton = DefinitionLoader::load(&path).unwrap();
        assert_eq!(automaton.name, "Json Test");
        assert_eq!(automaton.transitions.len(), 1);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.aut");

        let mut file = File::create(&path).unwrap();
        file.write_all(b"This is not a definition").unwrap();

        assert!(DefinitionLoader::load(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = DefinitionLoader::load(Path::new("/nonexistent/definition.aut"));
        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_load_all_from_directory() {
        let dir = tempdir().unwrap();

        let valid_path = dir.path().join("valid.aut");
        File::create(&valid_path)
            .unwrap()
            .write_all(FA_DEFINITION.as_bytes())
            .unwrap();

        let invalid_path = dir.path().join("invalid.aut");
        File::create(&invalid_path)
            .unwrap()
            .write_all(b"not a definition")
            .unwrap();

        let ignored_path = dir.path().join("notes.txt");
        File::create(&ignored_path)
            .unwrap()
            .write_all(b"ignored")
            .unwrap();

        let results = DefinitionLoader::load_all(dir.path());
        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_load_all_missing_directory() {
        let results = DefinitionLoader::load_all(Path::new("/nonexistent/definitions"));
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
