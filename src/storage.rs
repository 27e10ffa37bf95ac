use crate::error::StorageError;
use crate::task::Task;
use log::{debug, error, info};
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
};

/// Key the task list is stored under.
pub const TODOS_KEY: &str = "todos";

/// A string key-value medium the task list is mirrored into.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keeps each key in `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| StorageError::Io { path, source })
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads the stored task list. Missing, unreadable or corrupt data all come
/// back as an empty list; the failure only shows up in the log.
pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Task> {
    let data = match store.get(TODOS_KEY) {
        Ok(Some(data)) => data,
        Ok(None) => {
            debug!("no stored tasks, starting empty");
            return Vec::new();
        }
        Err(err) => {
            error!("Error loading todos: {err}");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Task>>(&data) {
        Ok(tasks) => {
            info!("loaded {} tasks", tasks.len());
            tasks
        }
        Err(err) => {
            error!("Error loading todos: {err}");
            Vec::new()
        }
    }
}

/// Overwrites the stored task list. Best effort: a failed write is logged and
/// the caller's in-memory list stays authoritative.
pub fn save<S: KeyValueStore + ?Sized>(store: &mut S, tasks: &[Task]) {
    if let Err(err) = try_save(store, tasks) {
        error!("Failed to save tasks: {err}");
    }
}

fn try_save<S: KeyValueStore + ?Sized>(store: &mut S, tasks: &[Task]) -> Result<(), StorageError> {
    let data = serde_json::to_string_pretty(tasks)?;
    store.set(TODOS_KEY, &data)?;
    debug!("saved {} tasks", tasks.len());
    Ok(())
}
