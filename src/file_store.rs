use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, ErrorKind, Write},
    path::Path,
};

use chrono::{Local, NaiveDateTime};

use crate::errors::CalcError;

pub const LOG_PREFIX: &str = "log_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub type Lines<'a> = Box<dyn Iterator<Item = Result<String, CalcError>> + 'a>;

/// File access for the calculation logs, always relative to a log directory.
pub trait FileStore {
    fn directory_exists(&self, dir: &Path) -> bool;

    fn create_directory(&self, dir: &Path) -> Result<(), CalcError>;

    fn is_directory_empty(&self, dir: &Path) -> Result<bool, CalcError>;

    /// Creates an empty file, failing if `name` is already taken.
    fn create_file(&self, dir: &Path, name: &str) -> Result<String, CalcError>;

    fn list_files(&self, dir: &Path) -> Result<Vec<String>, CalcError>;

    fn read_file_lines<'a>(&'a self, dir: &Path, name: &str) -> Result<Lines<'a>, CalcError>;

    fn append_line(&self, dir: &Path, name: &str, line: &str) -> Result<(), CalcError>;

    /// The newest log file. Timestamps are fixed width, so the greatest name wins.
    fn most_recent_file(&self, dir: &Path) -> Result<Option<String>, CalcError> {
        Ok(self
            .list_files(dir)?
            .into_iter()
            .filter(|name| name.starts_with(LOG_PREFIX))
            .max())
    }

    fn create_log_file(&self, dir: &Path) -> Result<String, CalcError> {
        self.claim_log_file(dir, log_file_name(Local::now().naive_local()))
    }

    /// Creates `name`, or shares it with another run started in the same second.
    fn claim_log_file(&self, dir: &Path, name: String) -> Result<String, CalcError> {
        match self.create_file(dir, &name) {
            Err(CalcError::Io(err)) if err.kind() == ErrorKind::AlreadyExists => {
                info!("Log file {} already exists, appending to it", name);
                Ok(name)
            }
            created => created,
        }
    }
}

pub fn log_file_name(created: NaiveDateTime) -> String {
    format!("{}{}", LOG_PREFIX, created.format(TIMESTAMP_FORMAT))
}

pub struct DiskFileStore;

impl FileStore for DiskFileStore {
    fn directory_exists(&self, dir: &Path) -> bool {
        dir.is_dir()
    }

    fn create_directory(&self, dir: &Path) -> Result<(), CalcError> {
        fs::create_dir_all(dir)?;
        info!("Created log directory {}", dir.display());
        Ok(())
    }

    fn is_directory_empty(&self, dir: &Path) -> Result<bool, CalcError> {
        Ok(fs::read_dir(dir)?.next().is_none())
    }

    fn create_file(&self, dir: &Path, name: &str) -> Result<String, CalcError> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(name))?;
        info!("Created log file {}", dir.join(name).display());
        Ok(name.to_string())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<String>, CalcError> {
        let mut names = vec![];
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }

    fn read_file_lines<'a>(&'a self, dir: &Path, name: &str) -> Result<Lines<'a>, CalcError> {
        let reader = BufReader::new(File::open(dir.join(name))?);
        Ok(Box::new(reader.lines().map(|line| line.map_err(CalcError::from))))
    }

    fn append_line(&self, dir: &Path, name: &str, line: &str) -> Result<(), CalcError> {
        // The handle lives only for this call and is closed on every return path.
        let mut file = OpenOptions::new().append(true).open(dir.join(name))?;
        writeln!(file, "{}", line)?;
        file.flush()?;
        debug!("Appended to {}: {}", name, line);
        Ok(())
    }
}
