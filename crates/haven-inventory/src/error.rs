use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid transactions in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
