use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err.to_string())
    }
}

/// The flat collections this system persists, one JSON array file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Patients,
    Professionals,
    Appointments,
    Attendances,
    Records,
    Notifications,
}

impl Collection {
    pub const ALL: [Collection; 7] = [
        Collection::Users,
        Collection::Patients,
        Collection::Professionals,
        Collection::Appointments,
        Collection::Attendances,
        Collection::Records,
        Collection::Notifications,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Users => "users.json",
            Collection::Patients => "patients.json",
            Collection::Professionals => "professionals.json",
            Collection::Appointments => "appointments.json",
            Collection::Attendances => "attendances.json",
            Collection::Records => "records.json",
            Collection::Notifications => "notifications.json",
        }
    }
}

/// Next id in a collection: max of existing ids, default 0, plus one.
/// Callers must invoke this inside `JsonStore::update` so allocation and
/// insertion happen under the same collection lock.
pub fn next_id(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().max().unwrap_or(0) + 1
}

/// Filesystem-backed document store. Every write is a full-file overwrite;
/// `update` holds the collection's mutex across read-modify-write so
/// concurrent writers cannot lose each other's changes or mint duplicate
/// ids.
pub struct JsonStore {
    data_dir: PathBuf,
    locks: HashMap<Collection, Mutex<()>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let locks = Collection::ALL
            .iter()
            .map(|&collection| (collection, Mutex::new(())))
            .collect();

        Self {
            data_dir: data_dir.into(),
            locks,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Create the data directory and seed every missing collection file
    /// with an empty array.
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;

        for collection in Collection::ALL {
            let path = self.path(collection);
            if tokio::fs::try_exists(&path).await? {
                continue;
            }
            debug!("Initializing collection file {}", path.display());
            tokio::fs::write(&path, "[]").await?;
        }

        Ok(())
    }

    /// Read a full collection. An absent or corrupt file reads as empty.
    pub async fn load<T: DeserializeOwned>(&self, collection: Collection) -> Vec<T> {
        let path = self.path(collection);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => items,
            Err(err) => {
                warn!("Collection {} is corrupt, treating as empty: {}", collection.file_name(), err);
                Vec::new()
            }
        }
    }

    /// Overwrite a full collection, pretty-printed UTF-8. Non-ASCII text is
    /// written literally (serde_json does not escape it).
    pub async fn save<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(self.path(collection), json).await?;
        Ok(())
    }

    /// Read-modify-write under the collection's lock. The closure's return
    /// value is passed back to the caller after a successful save.
    pub async fn update<T, R, F>(&self, collection: Collection, mutate: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let lock = self
            .locks
            .get(&collection)
            .expect("every collection has a lock");
        let _guard = lock.lock().await;

        let mut items: Vec<T> = self.load(collection).await;
        let result = mutate(&mut items);
        self.save(collection, &items).await?;

        Ok(result)
    }
}
