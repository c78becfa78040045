use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use tracing::debug;

use super::record::{from_value, to_record, DeleteMode, Record};
use crate::error::{RecordError, Result, StoreError};

/// Indentation used for collection files.
const INDENT: &[u8] = b"    ";

/// Durable storage for one collection, kept as a JSON array in a single file.
///
/// Every call reads or rewrites the whole file. Writes go straight to the
/// target path with no temp-file swap, so a crash mid-write can leave a
/// truncated file behind. There is no locking; two processes writing the
/// same file will race.
pub struct Repository<E> {
    path: PathBuf,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Record> Repository<E> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file as an empty collection if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.create_parent()?;
        fs::write(&self.path, "[]").map_err(|e| StoreError::io(&self.path, e))?;
        debug!(collection = E::COLLECTION, path = %self.path.display(), "Created empty collection file");
        Ok(())
    }

    /// Overwrite the file with `entities`.
    pub fn save_all(&self, entities: &[E]) -> Result<()> {
        let records = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| {
                to_record(entity)
                    .map(Value::Object)
                    .map_err(|source| self.record_error(index, source))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut contents = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut contents, PrettyFormatter::with_indent(INDENT));
        records
            .serialize(&mut serializer)
            .map_err(|e| StoreError::io(&self.path, e.into()))?;

        self.create_parent()?;
        fs::write(&self.path, contents).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(
            collection = E::COLLECTION,
            path = %self.path.display(),
            count = entities.len(),
            "Saved collection"
        );
        Ok(())
    }

    /// Load every record. A missing file is an empty collection; one bad
    /// record fails the whole load.
    pub fn get_all(&self) -> Result<Vec<E>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let values: Vec<Value> = serde_json::from_str(&contents).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })?;

        let entities = values
            .into_iter()
            .enumerate()
            .map(|(index, value)| from_value(value).map_err(|source| self.record_error(index, source)))
            .collect::<Result<Vec<E>>>()?;

        debug!(
            collection = E::COLLECTION,
            path = %self.path.display(),
            count = entities.len(),
            "Loaded collection"
        );
        Ok(entities)
    }

    pub fn get_by_id(&self, id: &E::Id) -> Result<Option<E>> {
        Ok(self.get_all()?.into_iter().find(|entity| &entity.id() == id))
    }

    pub fn find(&self, predicate: impl Fn(&E) -> bool) -> Result<Vec<E>> {
        Ok(self.get_all()?.into_iter().filter(|entity| predicate(entity)).collect())
    }

    /// Replace the first record sharing `entity`'s id.
    ///
    /// Fails with `StoreError::NotFound` when no record matches; the file is
    /// left untouched in that case.
    pub fn update(&self, entity: &E) -> Result<()> {
        let mut entities = self.get_all()?;
        let id = entity.id();
        let slot = entities
            .iter_mut()
            .find(|stored| stored.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: E::COLLECTION,
                id: id.to_string(),
            })?;
        *slot = entity.clone();
        self.save_all(&entities)
    }

    /// Remove or deactivate the first record with `id`, per `E::DELETE_MODE`.
    /// Returns false (and writes nothing) when there is no such record.
    pub fn delete(&self, id: &E::Id) -> Result<bool> {
        let mut entities = self.get_all()?;
        let Some(position) = entities.iter().position(|entity| &entity.id() == id) else {
            return Ok(false);
        };

        match E::DELETE_MODE {
            DeleteMode::Remove => {
                entities.remove(position);
            }
            DeleteMode::Deactivate => entities[position].deactivate(),
        }
        self.save_all(&entities)?;
        Ok(true)
    }

    fn create_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }
        Ok(())
    }

    pub(crate) fn record_error(&self, index: usize, source: RecordError) -> StoreError {
        StoreError::Record {
            path: self.path.clone(),
            index,
            source,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
