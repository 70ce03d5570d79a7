use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("host with id {0} already exists")]
    DuplicateKey(String),

    #[error("host store {} is in use by a running server (pid {holder})", path.display())]
    InUse { path: PathBuf, holder: String },

    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document error: {0}")]
    Serde(#[from] serde_json::Error),
}
