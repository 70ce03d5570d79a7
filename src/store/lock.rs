use std::path::{Path, PathBuf};

use super::StoreError;

/// Marker file next to a JSON collection while a server owns it.
///
/// Holds the owning process id. Removed when the guard is dropped; a lock
/// left behind by a crashed server is replaced by the next server start.
#[derive(Debug)]
pub struct ServerLock {
    path: PathBuf,
}

impl ServerLock {
    /// Takes the lock for `store_path`, returning the pid of a previous
    /// owner whose lock file was still present.
    pub async fn acquire(store_path: &Path) -> Result<(Self, Option<String>), StoreError> {
        let path = lock_path(store_path);
        let stale = lock_holder(store_path).await?;
        async_fs::write(&path, std::process::id().to_string()).await?;
        Ok((Self { path }, stale))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ServerLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn lock_path(store_path: &Path) -> PathBuf {
    store_path.with_extension("json.lock")
}

/// Pid recorded in the lock file of `store_path`, if a server holds it.
pub async fn lock_holder(store_path: &Path) -> Result<Option<String>, StoreError> {
    match async_fs::read_to_string(lock_path(store_path)).await {
        Ok(pid) => Ok(Some(pid.trim().to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
