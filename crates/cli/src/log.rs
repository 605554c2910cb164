use std::{
    fmt,
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Write},
    path::Path,
    sync::Mutex,
};

use chrono::Utc;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub static JOURNAL: Mutex<Option<Box<dyn Repository>>> = Mutex::new(None);

pub trait Repository: Send + Sync + 'static {
    fn write_entry(&self, entry: &Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:<5} {}", self.time, self.level, self.message)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Append-only file with one JSON encoded entry per line.
pub struct Journal {
    file: Mutex<File>,
}

impl Journal {
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub fn read_entries(path: &Path) -> Result<Vec<Entry>, Error> {
        let reader = BufReader::new(File::open(path)?);
        let mut entries = vec![];
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                entries.push(serde_json::from_str(&line)?);
            }
        }
        Ok(entries)
    }
}

impl Repository for Journal {
    fn write_entry(&self, entry: &Entry) -> Result<(), Error> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("journal lock poisoned"))?;
        file.write_all(&line)?;
        Ok(())
    }
}

static LOGGER: Logger = Logger;

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(level: LevelFilter, journal: Option<Box<dyn Repository>>) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = JOURNAL.lock() {
        *log = journal;
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

struct Logger;

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = Entry {
            time: Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            level: record.level(),
            message: record.args().to_string(),
        };
        eprintln!("{entry}");

        if let Ok(journal) = JOURNAL.lock() {
            if let Some(journal) = journal.as_ref() {
                let _ = journal.write_entry(&entry);
            }
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(level: Level, message: &str) -> Entry {
        Entry {
            time: "2024-03-01T07:30:00.000Z".to_string(),
            level,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_entry_display() {
        assert_eq!(
            entry(Level::Info, "trained model").to_string(),
            "2024-03-01T07:30:00.000Z INFO  trained model"
        );
        assert_eq!(
            entry(Level::Error, "failed").to_string(),
            "2024-03-01T07:30:00.000Z ERROR failed"
        );
    }

    #[test]
    fn test_journal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("journal.jsonl");
        let entries = vec![
            entry(Level::Debug, "loaded store"),
            entry(Level::Warn, "skipping exercise \"Hack Squat\""),
        ];

        let journal = Journal::open(&path).unwrap();
        for entry in &entries {
            journal.write_entry(entry).unwrap();
        }
        drop(journal);
        Journal::open(&path)
            .unwrap()
            .write_entry(&entry(Level::Info, "reopened"))
            .unwrap();

        let mut expected = entries;
        expected.push(entry(Level::Info, "reopened"));
        assert_eq!(Journal::read_entries(&path).unwrap(), expected);
    }

    #[test]
    fn test_entry_serde() {
        assert_eq!(
            serde_json::to_string(&entry(Level::Warn, "x")).unwrap(),
            r#"{"time":"2024-03-01T07:30:00.000Z","level":"Warn","message":"x"}"#
        );
    }
}
