//! JSON-file-per-entity repository.
//!
//! # Responsibility
//! - Persist each entity as `<id>.json` inside one private directory.
//! - Rebuild the full collection by listing that directory.
//!
//! # Invariants
//! - Each file holds exactly one JSON value followed by a newline.
//! - Files are replaced by rename from a sibling `.tmp` file, so a failed
//!   write leaves the previous content in place.
//! - Identifier allocation and file writes happen under the write lock.
//! - `get_all` skips unreadable entries with a `warn` event instead of
//!   failing the whole scan.
//! - The directory is never removed by this type.

use super::repository::{EntityId, RepoError, RepoResult, Repository};
use crate::collection::Array;
use crate::config::FileRepoConfig;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

const ENTITY_FILE_EXTENSION: &str = "json";
const TEMP_FILE_EXTENSION: &str = "json.tmp";

/// Repository storing one JSON document per entity.
pub struct FileRepository<T> {
    dir: PathBuf,
    /// `None` once `EntityId::MAX` has been handed out.
    next_id: RwLock<Option<EntityId>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> FileRepository<T> {
    /// Creates a repository in a fresh, uniquely named directory.
    ///
    /// The directory is `<root_dir>/<uuid>` where `root_dir` defaults to the
    /// OS temp directory.
    ///
    /// # Errors
    /// - Returns `RepoError::Io` when the directory cannot be created.
    pub fn new(config: &FileRepoConfig) -> RepoResult<Self> {
        let root = config.root_dir.clone().unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&root)?;
        let dir = root.join(Uuid::new_v4().to_string());
        if let Err(err) = fs::create_dir(&dir) {
            warn!(
                "event=file_repo_open module=repo status=error dir={} error={err}",
                dir.display()
            );
            return Err(err.into());
        }

        info!(
            "event=file_repo_open module=repo status=ok mode=fresh dir={}",
            dir.display()
        );
        Ok(Self {
            dir,
            next_id: RwLock::new(Some(1)),
            _entity: PhantomData,
        })
    }

    /// Reopens a directory written by an earlier instance.
    ///
    /// New identifiers continue after the largest one already on disk.
    ///
    /// A directory already holding `EntityId::MAX` can still be read, but
    /// `create` on it fails with `RepoError::IdsExhausted`.
    ///
    /// # Errors
    /// - Returns `RepoError::Io` when `dir` cannot be listed.
    pub fn open(dir: impl Into<PathBuf>) -> RepoResult<Self> {
        let dir = dir.into();
        let next_id = match list_entity_files(&dir)?.last() {
            Some((id, _)) => id.checked_add(1),
            None => Some(1),
        };

        match next_id {
            Some(next_id) => info!(
                "event=file_repo_open module=repo status=ok mode=reopen dir={} next_id={next_id}",
                dir.display()
            ),
            None => warn!(
                "event=file_repo_open module=repo status=ok mode=reopen dir={} ids_exhausted=true",
                dir.display()
            ),
        }
        Ok(Self {
            dir,
            next_id: RwLock::new(next_id),
            _entity: PhantomData,
        })
    }

    /// Directory holding this repository's files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entity_path(&self, id: EntityId) -> PathBuf {
        self.dir.join(format!("{id}.{ENTITY_FILE_EXTENSION}"))
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> for FileRepository<T> {
    fn create(&self, entity: T) -> RepoResult<EntityId> {
        let mut next_id = self.next_id.write().unwrap_or_else(PoisonError::into_inner);
        let id = next_id.ok_or(RepoError::IdsExhausted)?;
        save_json(&self.entity_path(id), &entity)?;
        *next_id = id.checked_add(1);
        debug!("event=entity_create module=repo backend=file status=ok id={id}");
        Ok(id)
    }

    fn update(&self, id: EntityId, entity: T) -> RepoResult<()> {
        let _guard = self.next_id.write().unwrap_or_else(PoisonError::into_inner);
        let path = self.entity_path(id);
        if !path.try_exists()? {
            return Err(RepoError::NotFound(id));
        }
        save_json(&path, &entity)
    }

    fn get(&self, id: EntityId) -> RepoResult<T> {
        let _guard = self.next_id.read().unwrap_or_else(PoisonError::into_inner);
        load_json(&self.entity_path(id), id)
    }

    fn get_all(&self) -> RepoResult<Array<T>> {
        let _guard = self.next_id.read().unwrap_or_else(PoisonError::into_inner);
        let mut entities = Array::new();

        for (id, path) in list_entity_files(&self.dir)? {
            match load_json(&path, id) {
                Ok(entity) => {
                    entities.push(entity);
                }
                Err(err) => warn!(
                    "event=file_repo_scan module=repo status=skip file={} error={err}",
                    path.display()
                ),
            }
        }

        Ok(entities)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let _guard = self.next_id.write().unwrap_or_else(PoisonError::into_inner);
        match fs::remove_file(self.entity_path(id)) {
            Ok(()) => {
                debug!("event=entity_delete module=repo backend=file status=ok id={id}");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Err(RepoError::NotFound(id)),
            Err(err) => Err(err.into()),
        }
    }
}

/// Lists `<id>.json` files sorted by id, skipping names that are not ids.
fn list_entity_files(dir: &Path) -> RepoResult<Vec<(EntityId, PathBuf)>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(ENTITY_FILE_EXTENSION) {
            continue;
        }

        let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("");
        match stem.parse::<EntityId>() {
            Ok(id) => files.push((id, path)),
            Err(err) => warn!(
                "event=file_repo_scan module=repo status=skip file={} error={err}",
                path.display()
            ),
        }
    }

    files.sort_by_key(|(id, _)| *id);
    Ok(files)
}

fn load_json<T: DeserializeOwned>(path: &Path, id: EntityId) -> RepoResult<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(RepoError::NotFound(id)),
        Err(err) => return Err(err.into()),
    };
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn save_json<T: Serialize>(path: &Path, entity: &T) -> RepoResult<()> {
    let mut bytes = serde_json::to_vec(entity)?;
    bytes.push(b'\n');

    let temp_path = path.with_extension(TEMP_FILE_EXTENSION);
    fs::write(&temp_path, &bytes)?;
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }
    Ok(())
}
