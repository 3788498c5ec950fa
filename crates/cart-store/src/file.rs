use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use common::CartEntry;
use tokio::sync::Mutex;

use crate::{Result, StoreKey, codec, store::CartStore};

/// File-backed cart store: one JSON file per key inside a directory.
///
/// Saves write a sibling temp file and rename it over the target, so a crash
/// mid-write leaves the previous payload intact.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileCartStore {
    /// Creates a store rooted at `dir`. The directory is created lazily on the
    /// first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file that holds the payload for `key`.
    pub fn path_for(&self, key: &StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Escapes a key into a portable file name.
fn file_stem(key: &StoreKey) -> String {
    let mut stem = String::with_capacity(key.as_str().len());
    for byte in key.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{byte:02X}"));
        }
    }
    stem
}

#[async_trait]
impl CartStore for FileCartStore {
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn load(&self, key: &StoreKey) -> Result<Option<Vec<CartEntry>>> {
        let payload = match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(payload) => payload,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        codec::decode(key, &payload).map(Some)
    }

    #[tracing::instrument(skip(self, entries), fields(dir = %self.dir.display(), entries = entries.len()))]
    async fn save(&self, key: &StoreKey, entries: &[CartEntry]) -> Result<()> {
        let payload = codec::encode(entries)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove(&self, key: &StoreKey) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
