//! Directory-backed origin tier

use std::io;
use std::path::{Path, PathBuf};

use stashline::{async_trait, Error, Getter, Result};
use tracing::trace;

/// Store label carried by errors from the origin
pub const STORE: &str = "origin";

/// Read-only origin serving each key from a file of the same name
///
/// Keys that are not plain file names (path separators, `.`, `..`) never
/// resolve, so a key cannot reach outside the directory.
#[derive(Debug, Clone)]
pub struct FileOrigin {
    root: PathBuf,
}

impl FileOrigin {
    /// Serve files from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory served
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(|c: char| matches!(c, '/' | '\\' | '\0'));
        plain.then(|| self.root.join(key))
    }
}

#[async_trait]
impl Getter<Vec<u8>> for FileOrigin {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = self.path_for(key) else {
            trace!(key, "key is not a plain file name");
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::backend(STORE, e)),
        }
    }
}
