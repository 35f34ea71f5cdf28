//! Username -> Steam ID cache, so repeat visitors skip ResolveVanityURL.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::Local;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub trait IdCache: Send + Sync {
    /// `Ok(None)` on a miss. An entry with an empty ID is a miss too.
    fn lookup(&self, steam_name: &str) -> Result<Option<String>>;

    /// Inserts the entry or overwrites the ID of an existing one.
    fn store(&self, steam_name: &str, steam_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    None,
    File,
    Sqlite,
}

impl FromStr for CacheKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "file" => Ok(Self::File),
            "sqlite" | "db" => Ok(Self::Sqlite),
            other => Err(Error::Config(format!(
                "unknown cache kind `{other}` (expected none, file or sqlite)"
            ))),
        }
    }
}

pub fn open(kind: CacheKind, path: &Path) -> Result<Arc<dyn IdCache>> {
    Ok(match kind {
        CacheKind::None => Arc::new(NoCache),
        CacheKind::File => Arc::new(FileCache::new(path)),
        CacheKind::Sqlite => Arc::new(SqliteCache::new(path)?),
    })
}

fn create_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(fs::create_dir_all(parent)?),
        _ => Ok(()),
    }
}

pub struct NoCache;

impl IdCache for NoCache {
    fn lookup(&self, _steam_name: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn store(&self, _steam_name: &str, _steam_id: &str) -> Result<()> {
        Ok(())
    }
}

/// One `name<TAB>id<TAB>resolved_at` line per user.
pub struct FileCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

struct FileEntry {
    steam_name: String,
    steam_id: String,
    resolved_at: String,
}

impl FileCache {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_entries(&self) -> Result<Vec<FileEntry>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let entries = contents
            .lines()
            .filter_map(|line| {
                let mut fields = line.split('\t');
                let steam_name = fields.next()?;
                let steam_id = fields.next()?;
                // A line without its timestamp was cut short; its ID may be too.
                let resolved_at = fields.next()?;
                Some(FileEntry {
                    steam_name: steam_name.to_string(),
                    steam_id: steam_id.to_string(),
                    resolved_at: resolved_at.to_string(),
                })
            })
            .collect();

        Ok(entries)
    }
}

fn is_storable(steam_name: &str) -> bool {
    !steam_name.is_empty() && !steam_name.contains(['\t', '\n', '\r'])
}

impl IdCache for FileCache {
    fn lookup(&self, steam_name: &str) -> Result<Option<String>> {
        let id = self
            .read_entries()?
            .into_iter()
            .find(|entry| entry.steam_name == steam_name)
            .map(|entry| entry.steam_id)
            .filter(|id| !id.is_empty());

        Ok(id)
    }

    fn store(&self, steam_name: &str, steam_id: &str) -> Result<()> {
        if !is_storable(steam_name) {
            return Ok(());
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| {
            warn!("File cache lock was poisoned by a panicked writer");
            e.into_inner()
        });
        let mut entries = self.read_entries()?;
        let resolved_at = Local::now().to_rfc3339();

        match entries.iter_mut().find(|e| e.steam_name == steam_name) {
            Some(entry) => {
                entry.steam_id = steam_id.to_string();
                entry.resolved_at = resolved_at;
            }
            None => entries.push(FileEntry {
                steam_name: steam_name.to_string(),
                steam_id: steam_id.to_string(),
                resolved_at,
            }),
        }

        let contents: String = entries
            .iter()
            .map(|e| format!("{}\t{}\t{}\n", e.steam_name, e.steam_id, e.resolved_at))
            .collect();

        // Readers take no lock, so the new contents land with a rename.
        create_parent_dir(&self.path)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(contents.as_bytes())?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

pub struct SqliteCache {
    path: PathBuf,
}

impl SqliteCache {
    /// Creates the database file and the `users` table if needed.
    pub fn new(path: &Path) -> Result<Self> {
        create_parent_dir(path)?;

        let cache = Self {
            path: path.to_path_buf(),
        };
        cache.connect()?.execute(
            "create table if not exists users (
                id integer primary key,
                steam_name text not null unique,
                steam_id text,
                updated datetime
             )",
            [],
        )?;

        Ok(cache)
    }

    // rusqlite connections are not Sync, so every call gets its own.
    fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }
}

impl IdCache for SqliteCache {
    fn lookup(&self, steam_name: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        let steam_id: Option<Option<String>> = conn
            .query_row(
                "SELECT steam_id FROM users WHERE steam_name = ?1",
                params![steam_name],
                |row| row.get(0),
            )
            .optional()?;

        Ok(steam_id.flatten().filter(|id| !id.is_empty()))
    }

    fn store(&self, steam_name: &str, steam_id: &str) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO users (steam_name, steam_id, updated) VALUES (?1, ?2, ?3)
             ON CONFLICT(steam_name) DO UPDATE SET steam_id = excluded.steam_id, updated = excluded.updated",
            params![steam_name, steam_id, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
