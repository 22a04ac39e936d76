//! JSON snapshot implementation of the RevocationRepository trait.
//!
//! The full record set is kept in memory and mirrored to one JSON file.
//! Every change writes a complete new snapshot to a temporary file in the
//! same directory, syncs it, and renames it over the previous snapshot. The
//! in-memory view is only swapped once the rename has succeeded, so a failed
//! write leaves neither the file nor the view changed.
//!
//! The store belongs to a single process. `open` takes an exclusive lock on
//! a `<file>.lock` sidecar and holds it until the store is dropped; a second
//! open of the same path fails with `InfrastructureError::StoreLocked`.
//! Deployments with several server instances use the MySQL or Redis store.
//!
//! Writers are serialized by a separate mutex and never hold the record
//! lock while touching the disk, so lookups keep answering during a write.
//! Each write runs in its own task: a caller that stops waiting does not
//! abort it halfway, and the view always matches the last renamed snapshot.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use sh_core::domain::entities::{RevocationRecord, TokenIdentifier};
use sh_core::errors::DomainError;
use sh_core::repositories::RevocationRepository;

use crate::InfrastructureError;

const SNAPSHOT_VERSION: u32 = 1;

/// On-disk layout
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    records: Vec<RevocationRecord>,
}

type RecordMap = BTreeMap<TokenIdentifier, RevocationRecord>;

/// File-backed revocation store
pub struct FileRevocationRepository {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    records: RwLock<RecordMap>,
    /// Held for the whole read-modify-write of one snapshot
    writer: Mutex<()>,
    /// Exclusive lock on the sidecar, released on drop
    _lock: File,
}

impl FileRevocationRepository {
    /// Open the store at `path`, loading any existing snapshot
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file is
    /// an error: starting empty would silently un-revoke tokens.
    ///
    /// # Errors
    /// * `StoreLocked` - Another live store already owns `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, InfrastructureError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let lock_path = lock_path_for(&path)?;
        let lock = tokio::task::spawn_blocking(move || acquire_lock(&lock_path))
            .await
            .map_err(|e| InfrastructureError::General(format!("Lock task failed: {}", e)))??;

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => Self::parse_snapshot(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RecordMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            path = %path.display(),
            records = records.len(),
            "Opened revocation file store"
        );

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                records: RwLock::new(records),
                writer: Mutex::new(()),
                _lock: lock,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.records.read().await.is_empty()
    }

    fn parse_snapshot(bytes: &[u8]) -> Result<RecordMap, InfrastructureError> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(InfrastructureError::Config(format!(
                "Unsupported revocation snapshot version {}",
                snapshot.version
            )));
        }

        snapshot
            .records
            .into_iter()
            .map(|record| {
                TokenIdentifier::from_hex(record.token_id.as_str())
                    .map(|id| (id, record.clone()))
                    .ok_or_else(|| {
                        InfrastructureError::General(format!(
                            "Invalid token id in revocation snapshot: {}",
                            record.token_id
                        ))
                    })
            })
            .collect()
    }

    /// Apply `change` to a copy of the records and persist it
    ///
    /// `change` returns how many records it touched; zero skips the write.
    /// The work runs in a spawned task so it completes even if the caller's
    /// future is dropped.
    async fn apply<F>(&self, change: F) -> Result<usize, InfrastructureError>
    where
        F: FnOnce(&mut RecordMap) -> usize + Send + 'static,
    {
        let inner = self.inner.clone();

        tokio::spawn(async move {
            let _writer = inner.writer.lock().await;

            let mut updated = inner.records.read().await.clone();
            let changed = change(&mut updated);
            if changed == 0 {
                return Ok(0);
            }

            let path = inner.path.clone();
            let updated = tokio::task::spawn_blocking(move || {
                persist(&path, &updated).map(|()| updated)
            })
            .await
            .map_err(|e| InfrastructureError::General(format!("Snapshot task failed: {}", e)))??;

            *inner.records.write().await = updated;
            Ok::<usize, InfrastructureError>(changed)
        })
        .await
        .map_err(|e| InfrastructureError::General(format!("Revocation write task failed: {}", e)))?
    }
}

fn lock_path_for(path: &Path) -> Result<PathBuf, InfrastructureError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| InfrastructureError::Config("Invalid revocation file path".to_string()))?
        .to_string_lossy();
    Ok(path.with_file_name(format!("{}.lock", file_name)))
}

fn acquire_lock(lock_path: &Path) -> Result<File, InfrastructureError> {
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(lock_path)?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(file),
        Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Err(
            InfrastructureError::StoreLocked(lock_path.display().to_string()),
        ),
        Err(e) => Err(e.into()),
    }
}

/// Atomically replace the snapshot file at `path` with `records`
fn persist(path: &Path, records: &RecordMap) -> Result<(), InfrastructureError> {
    let snapshot = Snapshot {
        version: SNAPSHOT_VERSION,
        records: records.values().cloned().collect(),
    };
    let content = serde_json::to_vec_pretty(&snapshot)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| InfrastructureError::Config("Invalid revocation file path".to_string()))?
        .to_string_lossy();
    let tmp_path = path.with_file_name(format!(".{}.tmp.{}", file_name, uuid::Uuid::new_v4()));

    if let Err(e) = write_synced(&tmp_path, &content) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!(path = %path.display(), records = records.len(), "Revocation snapshot written");
    Ok(())
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[async_trait]
impl RevocationRepository for FileRevocationRepository {
    async fn record_revocation(&self, record: RevocationRecord) -> Result<(), DomainError> {
        if self.inner.records.read().await.contains_key(&record.token_id) {
            return Ok(());
        }

        self.apply(move |records| {
            if records.contains_key(&record.token_id) {
                return 0;
            }
            records.insert(record.token_id.clone(), record);
            1
        })
        .await
        .map(|_| ())
        .map_err(|e| {
            error!(error = %e, "Failed to persist revocation snapshot");
            DomainError::from(e)
        })
    }

    async fn is_revoked(&self, token_id: &TokenIdentifier) -> Result<bool, DomainError> {
        Ok(self.inner.records.read().await.contains_key(token_id))
    }

    async fn find_record(
        &self,
        token_id: &TokenIdentifier,
    ) -> Result<Option<RevocationRecord>, DomainError> {
        Ok(self.inner.records.read().await.get(token_id).cloned())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.apply(move |records| {
            let before = records.len();
            records.retain(|_, record| !record.is_expired_at(now));
            before - records.len()
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to persist revocation snapshot after purge");
            DomainError::from(e)
        })
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        let dir = match self.inner.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        };
        tokio::fs::metadata(&dir)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::storage(format!("Revocation directory unavailable: {}", e)))
    }
}
