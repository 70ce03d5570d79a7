use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{HostFilter, HostStore, HostUpdate, StoreError, UpdateResult};
use crate::types::{Host, Track};

/// Host collection held in memory and mirrored to a JSON file.
///
/// Every mutation is applied to a copy of the collection, written to disk
/// and only then swapped in, so a failed write leaves both memory and file
/// untouched. The write lock is held for the whole statement.
pub struct JsonFileStore {
    path: Option<PathBuf>,
    hosts: RwLock<Vec<Host>>,
}

impl JsonFileStore {
    /// A store that never touches the file system.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            hosts: RwLock::new(Vec::new()),
        }
    }

    /// Opens the collection at `path`, starting empty when the file does not
    /// exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                async_fs::create_dir_all(parent).await?;
            }
        }

        let hosts = match async_fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            hosts: RwLock::new(hosts),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, hosts: &[Host]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(hosts)?;
        let tmp = path.with_extension("json.tmp");
        async_fs::write(&tmp, json).await?;
        if let Err(e) = async_fs::rename(&tmp, path).await {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl HostStore for JsonFileStore {
    async fn insert_one(&self, host: Host) -> Result<(), StoreError> {
        let mut hosts = self.hosts.write().await;
        if hosts.iter().any(|h| h.id == host.id) {
            return Err(StoreError::DuplicateKey(host.id));
        }

        let mut next = hosts.clone();
        next.push(host);
        self.persist(&next).await?;
        *hosts = next;
        Ok(())
    }

    async fn find_one(&self, filter: &HostFilter) -> Result<Option<Host>, StoreError> {
        let hosts = self.hosts.read().await;
        Ok(hosts.iter().find(|h| filter.matches(h)).cloned())
    }

    async fn update_one(
        &self,
        filter: &HostFilter,
        update: HostUpdate,
    ) -> Result<UpdateResult, StoreError> {
        let mut hosts = self.hosts.write().await;
        let Some(index) = hosts.iter().position(|h| filter.matches(h)) else {
            return Ok(UpdateResult::default());
        };

        let mut host = hosts[index].clone();
        if !update.apply(&mut host) {
            return Ok(UpdateResult {
                matched: 1,
                modified: 0,
                document: Some(host),
            });
        }

        let mut next = hosts.clone();
        next[index] = host.clone();
        self.persist(&next).await?;
        *hosts = next;

        Ok(UpdateResult {
            matched: 1,
            modified: 1,
            document: Some(host),
        })
    }

    async fn delete_one(&self, filter: &HostFilter) -> Result<bool, StoreError> {
        let mut hosts = self.hosts.write().await;
        let Some(index) = hosts.iter().position(|h| filter.matches(h)) else {
            return Ok(false);
        };

        let mut next = hosts.clone();
        next.remove(index);
        self.persist(&next).await?;
        *hosts = next;
        Ok(true)
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let hosts = self.hosts.read().await;
        self.persist(&hosts).await
    }

    async fn project_party_tracks(&self, id: &str) -> Result<Option<Vec<Track>>, StoreError> {
        let hosts = self.hosts.read().await;
        Ok(hosts
            .iter()
            .find(|h| h.id == id)
            .map(|h| h.party.as_ref().map(|p| p.tracks.clone()).unwrap_or_default()))
    }
}
