/*
Copyright 2022 Jakub Lewandowski

This file is part of Snowpack Spin-up Initialiser (SPIN).

Snowpack Spin-up Initialiser (SPIN) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Snowpack Spin-up Initialiser (SPIN) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Snowpack Spin-up Initialiser (SPIN). If not, see https://www.gnu.org/licenses/.
*/

//! Module responsible for assembling and writing files
//! read by the snowpack simulator.
//!
//! Both the run configuration and the initial profile are
//! sectioned `KEY = VALUE` documents. They are built as data
//! (ordered sections of ordered entries) and rendered by a single
//! formatter, so that spacing and ordering are always the same.
//!
//! Files are never written in place. Contents go to a temporary
//! file in the destination directory which is renamed to the final
//! name only after it has been fully written, so the simulator
//! never sees a truncated file.

pub mod profile;
pub mod run_config;

use crate::errors::WriteError;
use crate::Float;
use log::{debug, warn};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempPath};

/// Value of a single document entry.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Text(Cow<'static, str>),
    Int(i64),
    Float(Float),
}

impl Value {
    /// Creates a value without fractional part when the
    /// number is integral (eg. altitude `3200`).
    pub fn compact(x: Float) -> Self {
        if x.fract() == 0.0 && x.abs() < 1.0e15 {
            Value::Int(x as i64)
        } else {
            Value::Float(x)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "{}", text),
            Value::Int(int) => write!(f, "{}", int),
            // debug formatting is the shortest round-trip form
            // and always keeps the decimal point
            Value::Float(float) => write!(f, "{:?}", float),
        }
    }
}

impl From<&'static str> for Value {
    fn from(text: &'static str) -> Self {
        Value::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(Cow::Owned(text))
    }
}

impl From<i64> for Value {
    fn from(int: i64) -> Self {
        Value::Int(int)
    }
}

impl From<Float> for Value {
    fn from(float: Float) -> Self {
        Value::Float(float)
    }
}

/// Named section with ordered entries.
#[derive(Clone, PartialEq, Debug)]
pub struct Section {
    name: &'static str,
    entries: Vec<(&'static str, Value)>,
}

impl Section {
    pub fn new(name: &'static str) -> Self {
        Section {
            name,
            entries: vec![],
        }
    }

    pub fn entry(mut self, key: &'static str, value: impl Into<Value>) -> Self {
        self.entries.push((key, value.into()));
        self
    }

    pub fn entries<'a>(
        mut self,
        entries: impl IntoIterator<Item = &'a (&'static str, Value)>,
    ) -> Self {
        self.entries.extend(entries.into_iter().cloned());
        self
    }

    #[cfg(test)]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Returns the value of the first entry with given key.
    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry_key, _)| *entry_key == key)
            .map(|(_, value)| value)
    }
}

/// Ordered collection of sections with an optional
/// signature line preceding them.
#[derive(Clone, PartialEq, Debug)]
pub struct Document {
    signature: Option<&'static str>,
    sections: Vec<Section>,
    blank_between_sections: bool,
}

impl Document {
    /// Document in INI layout, with sections separated by blank lines.
    pub fn ini() -> Self {
        Document {
            signature: None,
            sections: vec![],
            blank_between_sections: true,
        }
    }

    /// Document in SMET layout, with a signature line
    /// and no gaps between sections.
    pub fn smet(signature: &'static str) -> Self {
        Document {
            signature: Some(signature),
            sections: vec![],
            blank_between_sections: false,
        }
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    #[cfg(test)]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn render(&self) -> String {
        let mut text = String::new();

        if let Some(signature) = self.signature {
            text.push_str(signature);
            text.push('\n');
        }

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 && self.blank_between_sections {
                text.push('\n');
            }

            text.push_str(&format!("[{}]\n", section.name));

            for (key, value) in &section.entries {
                text.push_str(&format!("{} = {}\n", key, value));
            }
        }

        text
    }
}

/// Writes a single file into the output directory, returning its path.
pub fn write_file(
    output_dir: &Path,
    file_name: &str,
    contents: &str,
) -> Result<PathBuf, WriteError> {
    let mut written = write_files(output_dir, &[(file_name, contents)])?;

    Ok(written.remove(0))
}

/// File fully written to a temporary path, waiting to be moved
/// over its destination.
struct Staged {
    temp_file: NamedTempFile,
    path: PathBuf,

    /// Copy of the file previously at `path`, restored if
    /// the set of files cannot be completed.
    backup: Option<TempPath>,
}

/// Writes a set of files into the output directory so that
/// either all of them are written or none is.
///
/// All files are first fully written to temporary files and only
/// then moved to their names. If any move fails, files already
/// moved are replaced by their previous versions, or removed
/// when there was none.
pub fn write_files(output_dir: &Path, files: &[(&str, &str)]) -> Result<Vec<PathBuf>, WriteError> {
    if !output_dir.is_dir() {
        return Err(WriteError::MissingDirectory(output_dir.to_path_buf()));
    }

    let mut staged = Vec::with_capacity(files.len());

    for (file_name, contents) in files {
        let path = output_dir.join(file_name);
        debug!("Staging {}", path.display());

        let temp_file = stage(output_dir, &path, contents)?;
        let backup = back_up(output_dir, &path)?;

        staged.push(Staged {
            temp_file,
            path,
            backup,
        });
    }

    let mut persisted: Vec<(PathBuf, Option<TempPath>)> = Vec::with_capacity(files.len());

    for file in staged {
        if let Err(err) = file.temp_file.persist(&file.path) {
            roll_back(persisted);

            return Err(WriteError::CantPersist {
                path: file.path,
                source: err.error,
            });
        }

        persisted.push((file.path, file.backup));
    }

    Ok(persisted.into_iter().map(|(path, _)| path).collect())
}

/// Writes contents to a temporary file next to the destination.
fn stage(output_dir: &Path, path: &Path, contents: &str) -> Result<NamedTempFile, WriteError> {
    let mut temp_file = NamedTempFile::new_in(output_dir).map_err(cant_create(output_dir))?;

    let cant_write = |source| WriteError::CantWrite {
        path: path.to_path_buf(),
        source,
    };

    temp_file.write_all(contents.as_bytes()).map_err(cant_write)?;
    temp_file.flush().map_err(cant_write)?;
    temp_file.as_file().sync_all().map_err(cant_write)?;

    Ok(temp_file)
}

fn cant_create(output_dir: &Path) -> impl Fn(std::io::Error) -> WriteError + '_ {
    move |source| WriteError::CantCreate {
        path: output_dir.to_path_buf(),
        source,
    }
}

/// Copies the file currently at `path` (if any) to a temporary path.
fn back_up(output_dir: &Path, path: &Path) -> Result<Option<TempPath>, WriteError> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup = NamedTempFile::new_in(output_dir)
        .map_err(cant_create(output_dir))?
        .into_temp_path();

    fs::copy(path, &backup).map_err(|source| WriteError::CantWrite {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(backup))
}

/// Brings back files replaced by an unfinished set of writes.
fn roll_back(persisted: Vec<(PathBuf, Option<TempPath>)>) {
    for (path, backup) in persisted {
        let restored = match backup {
            Some(backup) => backup.persist(&path).map_err(|err| err.error),
            None => fs::remove_file(&path),
        };

        if let Err(err) = restored {
            warn!("Cannot roll back {} after failed write: {}", path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{write_file, write_files, Document, Section, Value};
    use crate::errors::WriteError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn render_ini() {
        let doc = Document::ini()
            .section(Section::new("ONE").entry("A", "x").entry("B", 2_i64))
            .section(Section::new("TWO").entry("C", 1.5));

        assert_eq!(doc.render(), "[ONE]\nA = x\nB = 2\n\n[TWO]\nC = 1.5\n");
    }

    #[test]
    fn render_smet() {
        let doc = Document::smet("SMET 1.1 ASCII")
            .section(Section::new("HEADER").entry("altitude", Value::compact(3200.0)))
            .section(Section::new("DATA"));

        assert_eq!(doc.render(), "SMET 1.1 ASCII\n[HEADER]\naltitude = 3200\n[DATA]\n");
    }

    #[test]
    fn float_formatting() {
        assert_eq!(Value::from(-40.0).to_string(), "-40.0");
        assert_eq!(Value::from(68.0).to_string(), "68.0");
        assert_eq!(Value::from(250.5).to_string(), "250.5");
        assert_eq!(Value::compact(3200.0).to_string(), "3200");
        assert_eq!(Value::compact(3200.25).to_string(), "3200.25");
    }

    #[test]
    fn lookup_entry() {
        let section = Section::new("S").entry("K", "v");

        assert_eq!(section.get("K"), Some(&Value::from("v")));
        assert_eq!(section.get("k"), None);
    }

    #[test]
    fn writes_and_overwrites() {
        let dir = tempdir().unwrap();

        let path = write_file(dir.path(), "a.ini", "first\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");

        write_file(dir.path(), "a.ini", "second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");

        // no temporary files are left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");

        let result = write_files(&missing, &[("a.ini", "x"), ("b.sno", "y")]);

        assert!(matches!(result, Err(WriteError::MissingDirectory(_))));
        assert!(!missing.exists());
    }

    #[test]
    fn all_or_nothing() {
        let dir = tempdir().unwrap();

        // a directory in place of the second file makes its rename fail
        fs::create_dir(dir.path().join("b.sno")).unwrap();
        fs::write(dir.path().join("b.sno").join("keep"), "x").unwrap();

        let result = write_files(dir.path(), &[("a.ini", "x"), ("b.sno", "y")]);

        assert!(matches!(result, Err(WriteError::CantPersist { .. })));
        assert!(!dir.path().join("a.ini").exists());
        assert!(dir.path().join("b.sno").is_dir());
    }

    #[test]
    fn failed_set_keeps_previous_files() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("a.ini"), "old\n").unwrap();
        fs::create_dir(dir.path().join("b.sno")).unwrap();
        fs::write(dir.path().join("b.sno").join("keep"), "x").unwrap();

        let result = write_files(dir.path(), &[("a.ini", "new\n"), ("b.sno", "y")]);

        assert!(matches!(result, Err(WriteError::CantPersist { .. })));
        assert_eq!(fs::read_to_string(dir.path().join("a.ini")).unwrap(), "old\n");

        // neither staged files nor backups are left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn overwrite_leaves_no_backup() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("a.ini"), "old\n").unwrap();
        write_files(dir.path(), &[("a.ini", "new\n"), ("b.sno", "y")]).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("a.ini")).unwrap(), "new\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
